//! Error types for the Moltbook skill.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local argument validation failures. These never reach an executor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid email address: {candidate}")]
    InvalidEmail { candidate: String },

    #[error("post requires a title and content")]
    MissingPostArguments,
}

/// Failures of the action collaborator itself, as opposed to an action that
/// ran and reported an unsuccessful result.
///
/// The `Display` text is the failure description handed to the classifier.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Action script not found: {path}")]
    ScriptNotFound { path: String },

    #[error("Failed to spawn action {action}: {reason}")]
    SpawnFailed { action: String, reason: String },

    #[error("Action {action} execution failed: {reason}")]
    ExecutionFailed { action: String, reason: String },

    #[error("Action {action} timeout after {timeout:?}")]
    Timeout { action: String, timeout: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_description_mentions_timeout() {
        let err = ActionError::Timeout {
            action: "check_status".into(),
            timeout: Duration::from_secs(15),
        };
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn channel_error_from_io() {
        let err: ChannelError = std::io::Error::other("broken pipe").into();
        assert!(err.to_string().contains("broken pipe"));
    }
}
