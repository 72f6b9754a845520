//! Moltbook skill: chat command dispatcher for a Moltbook agent account.

pub mod actions;
pub mod channels;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod intent;
