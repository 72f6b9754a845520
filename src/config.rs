//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::actions::ActionKind;
use crate::error::ConfigError;

/// Default number of characters of raw action output echoed back to the user.
pub const DEFAULT_EXCERPT_CHARS: usize = 500;

/// Skill configuration.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Directory holding one `<action>.sh` script per action.
    pub scripts_dir: PathBuf,
    /// Program used to run the scripts.
    pub interpreter: String,
    /// Timeout for `setup_owner_email`.
    pub setup_timeout: Duration,
    /// Timeout for `check_status`.
    pub status_timeout: Duration,
    /// Timeout for `create_post`.
    pub post_timeout: Duration,
    /// Maximum characters of raw output quoted in a reply.
    pub excerpt_chars: usize,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("scripts"),
            interpreter: "bash".to_string(),
            setup_timeout: Duration::from_secs(15),
            status_timeout: Duration::from_secs(15),
            post_timeout: Duration::from_secs(20),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl SkillConfig {
    /// Load configuration from `MOLTBOOK_SKILL_*` environment variables.
    ///
    /// Invalid values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid skill configuration, using defaults");
            Self::default()
        })
    }

    /// Load configuration from the environment, rejecting malformed values.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let scripts_dir = lookup("MOLTBOOK_SKILL_SCRIPTS_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.scripts_dir);

        let interpreter = lookup("MOLTBOOK_SKILL_INTERPRETER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.interpreter);

        let setup_timeout = parse_secs(&lookup, "MOLTBOOK_SKILL_SETUP_TIMEOUT_SECS")?
            .unwrap_or(defaults.setup_timeout);
        let status_timeout = parse_secs(&lookup, "MOLTBOOK_SKILL_STATUS_TIMEOUT_SECS")?
            .unwrap_or(defaults.status_timeout);
        let post_timeout = parse_secs(&lookup, "MOLTBOOK_SKILL_POST_TIMEOUT_SECS")?
            .unwrap_or(defaults.post_timeout);

        let excerpt_chars = parse_positive(&lookup, "MOLTBOOK_SKILL_EXCERPT_CHARS")?
            .map(|n| n as usize)
            .unwrap_or(defaults.excerpt_chars);

        Ok(Self {
            scripts_dir,
            interpreter,
            setup_timeout,
            status_timeout,
            post_timeout,
            excerpt_chars,
        })
    }

    /// Timeout the collaborator enforces for the given action.
    pub fn timeout_for(&self, kind: ActionKind) -> Duration {
        match kind {
            ActionKind::SetupOwnerEmail => self.setup_timeout,
            ActionKind::CheckStatus => self.status_timeout,
            ActionKind::CreatePost => self.post_timeout,
        }
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_positive(lookup, key)?.map(Duration::from_secs))
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?} is not a number ({e})"),
    })?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(Some(value))
}
