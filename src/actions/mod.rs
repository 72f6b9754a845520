//! External actions delegated to the Moltbook scripts.

pub mod script;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ActionError;
use crate::intent::{Intent, PostDraft};

pub use script::ScriptExecutor;

/// The three delegated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SetupOwnerEmail,
    CheckStatus,
    CreatePost,
}

impl ActionKind {
    /// Logical action name, also the script stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SetupOwnerEmail => "setup_owner_email",
            ActionKind::CheckStatus => "check_status",
            ActionKind::CreatePost => "create_post",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external invocation: an action plus its ordered string arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    /// Correlation id for logs.
    pub id: Uuid,
    pub kind: ActionKind,
    pub args: Vec<String>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, args: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            args,
        }
    }

    pub fn setup_owner_email(email: &str) -> Self {
        Self::new(ActionKind::SetupOwnerEmail, vec![email.to_string()])
    }

    pub fn check_status() -> Self {
        Self::new(ActionKind::CheckStatus, Vec::new())
    }

    pub fn create_post(draft: &PostDraft) -> Self {
        Self::new(
            ActionKind::CreatePost,
            vec![
                draft.submolt.clone(),
                draft.title.clone(),
                draft.content.clone(),
            ],
        )
    }

    /// Build the request for an accepted intent.
    ///
    /// Rejected and unrecognized intents have no request.
    pub fn for_intent(intent: &Intent) -> Option<Self> {
        match intent {
            Intent::SetupEmail { email } => Some(Self::setup_owner_email(email)),
            Intent::StatusCheck => Some(Self::check_status()),
            Intent::CreatePost(draft) => Some(Self::create_post(draft)),
            Intent::Rejected(_) | Intent::Unrecognized => None,
        }
    }
}

/// Outcome of executing an [`ActionRequest`], reduced to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The action ran; its raw output.
    Completed(String),
    /// The collaborator could not complete the call; a failure description.
    Failed(String),
}

impl From<Result<String, ActionError>> for ActionResult {
    fn from(result: Result<String, ActionError>) -> Self {
        match result {
            Ok(output) => ActionResult::Completed(output),
            Err(e) => ActionResult::Failed(e.to_string()),
        }
    }
}

/// Executes action requests. The collaborator owns transport and timeouts.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, request: &ActionRequest) -> Result<String, ActionError>;
}
