//! Intent types produced by the matcher.

use crate::error::ValidationError;

/// Submolt used when a post command leaves it blank.
pub const DEFAULT_SUBMOLT: &str = "general";

/// The classified purpose of one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Register the owner email used for Moltbook login.
    SetupEmail { email: String },
    /// Query the agent's claim status.
    StatusCheck,
    /// Publish a post to a submolt.
    CreatePost(PostDraft),
    /// A recognized command whose arguments failed local validation.
    Rejected(ValidationError),
    /// Nothing matched.
    Unrecognized,
}

impl Intent {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::SetupEmail { .. } => "setup-email",
            Intent::StatusCheck => "status-check",
            Intent::CreatePost(_) => "create-post",
            Intent::Rejected(ValidationError::InvalidEmail { .. }) => "setup-email (rejected)",
            Intent::Rejected(ValidationError::MissingPostArguments) => "create-post (rejected)",
            Intent::Unrecognized => "unrecognized",
        }
    }
}

/// Arguments of a `moltbook-post` command, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub submolt: String,
    pub title: String,
    pub content: String,
}
