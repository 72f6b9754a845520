//! Action dispatch and response classification.
//!
//! For each accepted intent the handler builds one [`ActionRequest`](crate::actions::ActionRequest),
//! runs it, classifies the raw result against the action's marker table and
//! renders exactly one [`Reply`].

pub mod classifier;
pub mod handler;
pub mod replies;

pub use classifier::{FailureOutcome, Outcome};
pub use handler::SkillHandler;
pub use replies::Reply;
