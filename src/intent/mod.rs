//! Intent recognition for incoming chat text.
//!
//! A message is classified by [`IntentMatcher::classify`] into exactly one
//! [`Intent`]. Rules are tried in a fixed order and the first match wins.

pub mod matcher;
pub mod types;

pub use matcher::IntentMatcher;
pub use types::{Intent, PostDraft};
