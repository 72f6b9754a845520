//! Message handler: intent → action → classified reply.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::actions::{ActionExecutor, ActionRequest, ActionResult, ScriptExecutor};
use crate::channels::IncomingMessage;
use crate::config::{DEFAULT_EXCERPT_CHARS, SkillConfig};
use crate::dispatch::classifier::{self, FailureOutcome, Outcome};
use crate::dispatch::replies::{self, Reply};
use crate::intent::{Intent, IntentMatcher};

/// Handles one message at a time and always produces a reply.
///
/// Holds no per-message state; concurrent calls are independent.
pub struct SkillHandler {
    matcher: IntentMatcher,
    executor: Arc<dyn ActionExecutor>,
    excerpt_chars: usize,
}

impl SkillHandler {
    pub fn new(executor: Arc<dyn ActionExecutor>) -> Self {
        Self {
            matcher: IntentMatcher::new(),
            executor,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Handler backed by the action scripts described in `config`.
    pub fn from_config(config: &SkillConfig) -> Self {
        Self::new(Arc::new(ScriptExecutor::new(config))).with_excerpt_chars(config.excerpt_chars)
    }

    /// Set how many characters of raw output a reply may quote.
    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Classify and answer a message.
    pub async fn handle(&self, message: &IncomingMessage) -> Reply {
        debug!(channel = %message.channel, "Handling message");
        let intent = self.matcher.classify(message.content.as_deref());
        self.dispatch(&intent).await
    }

    /// Answer an already-classified intent.
    ///
    /// Rejected and unrecognized intents are answered locally without
    /// touching the executor.
    pub async fn dispatch(&self, intent: &Intent) -> Reply {
        let Some(request) = ActionRequest::for_intent(intent) else {
            return match intent {
                Intent::Rejected(error) => {
                    info!(intent = intent.label(), %error, "Rejected command arguments");
                    replies::validation(error)
                }
                _ => replies::help(),
            };
        };

        info!(
            request_id = %request.id,
            action = %request.kind,
            intent = intent.label(),
            "Dispatching action"
        );

        let result = self.execute(&request).await;
        self.render(intent, &request, result)
    }

    /// Run the request, turning errors and panics into failure descriptions.
    async fn execute(&self, request: &ActionRequest) -> ActionResult {
        match AssertUnwindSafe(self.executor.execute(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result.into(),
            Err(_) => ActionResult::Failed(format!("{} executor panicked", request.kind)),
        }
    }

    fn render(&self, intent: &Intent, request: &ActionRequest, result: ActionResult) -> Reply {
        match result {
            ActionResult::Completed(raw) => {
                let outcome = classifier::classify_output(request.kind, &raw);
                info!(request_id = %request.id, action = %request.kind, ?outcome, "Action completed");
                self.render_outcome(intent, outcome, &raw)
            }
            ActionResult::Failed(description) => {
                let outcome = classifier::classify_failure(&description);
                warn!(
                    request_id = %request.id,
                    action = %request.kind,
                    ?outcome,
                    error = %description,
                    "Action could not be executed"
                );
                match (outcome, intent) {
                    (FailureOutcome::ManualFallback, Intent::SetupEmail { email }) => {
                        replies::setup_manual_fallback(email)
                    }
                    (FailureOutcome::ManualFallback, Intent::StatusCheck) => {
                        replies::status_manual_fallback()
                    }
                    (FailureOutcome::ManualFallback, Intent::CreatePost(draft)) => {
                        replies::post_manual_fallback(draft)
                    }
                    _ => replies::execution_failed(&description),
                }
            }
        }
    }

    fn render_outcome(&self, intent: &Intent, outcome: Outcome, raw: &str) -> Reply {
        let limit = self.excerpt_chars;
        match intent {
            Intent::SetupEmail { email } => match outcome {
                Outcome::Success => replies::setup_success(email),
                Outcome::ClaimRequired => replies::setup_claim_required(email),
                Outcome::MissingCredential => replies::missing_credential(),
                _ => replies::setup_failed(raw, limit),
            },
            Intent::StatusCheck => match outcome {
                Outcome::Claimed => replies::status_claimed(),
                Outcome::PendingClaim => replies::status_pending_claim(),
                Outcome::MissingCredential => replies::missing_credential(),
                _ => replies::status_info(raw, limit),
            },
            Intent::CreatePost(draft) => match outcome {
                Outcome::Success => replies::post_success(&draft.title),
                Outcome::ClaimRequired => replies::post_claim_required(),
                Outcome::MissingCredential => replies::missing_credential(),
                _ => replies::post_failed(raw, limit),
            },
            Intent::Rejected(error) => replies::validation(error),
            Intent::Unrecognized => replies::help(),
        }
    }
}
