//! User-facing reply templates.

use std::fmt;

use crate::error::ValidationError;
use crate::intent::PostDraft;

pub const LOGIN_URL: &str = "https://moltbook.com/login";
pub const HOME_URL: &str = "https://moltbook.com";
pub const CREDENTIAL_ENV_VAR: &str = "MOLTBOOK_API_KEY";
pub const CREDENTIAL_FILE: &str = "~/.openclaw/credentials/moltbook_api_key";

pub const HELP: &str = "🤖 I didn't recognize that Moltbook command. Usage:\n\
- Set up my email for Moltbook login: your@email.com\n\
- setup-moltbook your@email.com\n\
- moltbook-status (or check-moltbook-status)\n\
- moltbook-post <submolt>|<title>|<content>";

pub const INVALID_EMAIL: &str =
    "❌ That email address doesn't look right. Please provide a valid email, e.g. setup-moltbook your@email.com";

pub const MISSING_POST_ARGUMENTS: &str = "❌ A post needs a title and content. Usage:\n\
moltbook-post <submolt>|<title>|<content>";

/// The single reply produced for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply(String);

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Reply> for String {
    fn from(reply: Reply) -> Self {
        reply.0
    }
}

/// First `limit` characters of raw output, marked when cut.
pub fn excerpt(raw: &str, limit: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "(no output)".to_string();
    }
    if trimmed.chars().count() <= limit {
        trimmed.to_string()
    } else {
        format!("{}…", trimmed.chars().take(limit).collect::<String>())
    }
}

pub fn help() -> Reply {
    Reply::new(HELP)
}

pub fn validation(error: &ValidationError) -> Reply {
    match error {
        ValidationError::InvalidEmail { .. } => Reply::new(INVALID_EMAIL),
        ValidationError::MissingPostArguments => Reply::new(MISSING_POST_ARGUMENTS),
    }
}

pub fn missing_credential() -> Reply {
    Reply::new(format!(
        "⚠️ No Moltbook API key was found.\n\
         Set the environment variable {CREDENTIAL_ENV_VAR}, or write the key to {CREDENTIAL_FILE}"
    ))
}

// ── setup_owner_email ───────────────────────────────────────────────

pub fn setup_success(email: &str) -> Reply {
    Reply::new(format!(
        "✅ A verification email has been sent to {email}!\n\n\
         Open it and follow the link to finish X verification.\n\n\
         Once verified you can log in at {LOGIN_URL}."
    ))
}

pub fn setup_claim_required(email: &str) -> Reply {
    Reply::new(format!(
        "⚠️ This Moltbook agent hasn't been claimed yet, so a login email can't be sent.\n\n\
         Finish the email + X verification on the claim page first, then run:\n\
         setup-moltbook {email}"
    ))
}

pub fn setup_failed(raw: &str, limit: usize) -> Reply {
    Reply::new(format!(
        "⚠️ Setting up the login email didn't succeed. Please check:\n\
         - the bot is connected to Moltbook\n\
         - the email address is correct\n\n\
         Response:\n{}",
        excerpt(raw, limit)
    ))
}

pub fn setup_manual_fallback(email: &str) -> Reply {
    Reply::new(format!(
        "⚠️ The Moltbook API couldn't be reached. Try these manual steps:\n\n\
         1. Visit {LOGIN_URL}\n\
         2. Enter your email: {email}\n\
         3. Click \"Send Login Link\"\n\
         4. Open the email and finish verification"
    ))
}

// ── check_status ────────────────────────────────────────────────────

pub fn status_claimed() -> Reply {
    Reply::new("✅ Your Moltbook agent is claimed and ready to post.")
}

pub fn status_pending_claim() -> Reply {
    Reply::new(
        "⏳ Your Moltbook agent is waiting to be claimed.\n\
         Open the claim link and complete the email + X verification, then check again with moltbook-status.",
    )
}

pub fn status_info(raw: &str, limit: usize) -> Reply {
    Reply::new(format!("ℹ️ Moltbook status:\n{}", excerpt(raw, limit)))
}

pub fn status_manual_fallback() -> Reply {
    Reply::new(format!(
        "⚠️ The Moltbook API couldn't be reached. To check manually:\n\n\
         1. Visit {HOME_URL}\n\
         2. Log in with your owner email\n\
         3. Open your agent's profile to see whether it is claimed"
    ))
}

// ── create_post ─────────────────────────────────────────────────────

pub fn post_success(title: &str) -> Reply {
    Reply::new(format!("✅ Posted \"{title}\" to Moltbook!"))
}

pub fn post_claim_required() -> Reply {
    Reply::new(
        "⚠️ This Moltbook agent hasn't been claimed yet, so it can't post.\n\n\
         Finish the email + X verification on the claim page first, then try again.",
    )
}

pub fn post_failed(raw: &str, limit: usize) -> Reply {
    Reply::new(format!(
        "❌ Posting to Moltbook failed.\n\nResponse:\n{}",
        excerpt(raw, limit)
    ))
}

pub fn post_manual_fallback(draft: &PostDraft) -> Reply {
    Reply::new(format!(
        "⚠️ The Moltbook API couldn't be reached. To post manually:\n\n\
         1. Visit {HOME_URL}/m/{}\n\
         2. Create a post titled \"{}\"\n\
         3. Paste your content and publish",
        draft.submolt, draft.title
    ))
}

// ── collaborator failures ───────────────────────────────────────────

pub fn execution_failed(description: &str) -> Reply {
    Reply::new(format!(
        "❌ The Moltbook action failed: {description}\n\nPlease try again later or contact an administrator."
    ))
}
