//! Ordered pattern rules that turn chat text into an [`Intent`].
//!
//! Rule order is the tie-break:
//! 1. setup, natural-language form (`Set up my email for Moltbook login: <email>`)
//! 2. setup, command form (`setup-moltbook <email>`)
//! 3. status (`moltbook-status` / `check-moltbook-status`, whole message only)
//! 4. post (`moltbook-post <submolt>|<title>|<content>`)
//!
//! Anything else is [`Intent::Unrecognized`].

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::ValidationError;
use crate::intent::types::{DEFAULT_SUBMOLT, Intent, PostDraft};

static SETUP_NATURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)set up my email for moltbook login:\s*(\S+)").expect("valid setup regex")
});

static SETUP_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)setup-moltbook\s+(\S+)").expect("valid setup-moltbook regex")
});

static STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:check-)?moltbook-status$").expect("valid status regex")
});

static POST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^moltbook-post(?:\s+(.*))?$").expect("valid post regex")
});

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// One recognition rule: a pattern and the extractor run on its captures.
pub struct IntentRule {
    /// Name used in logs and tests.
    pub name: &'static str,
    pattern: &'static LazyLock<Regex>,
    extract: fn(&Captures<'_>) -> Intent,
}

/// The rule list, in priority order.
static RULES: &[IntentRule] = &[
    IntentRule {
        name: "setup-natural",
        pattern: &SETUP_NATURAL,
        extract: extract_setup,
    },
    IntentRule {
        name: "setup-command",
        pattern: &SETUP_COMMAND,
        extract: extract_setup,
    },
    IntentRule {
        name: "status",
        pattern: &STATUS,
        extract: extract_status,
    },
    IntentRule {
        name: "post",
        pattern: &POST,
        extract: extract_post,
    },
];

/// Stateless classifier over [`RULES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentMatcher;

impl IntentMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    /// Classify message content. Absent content is treated as empty.
    pub fn classify(&self, content: Option<&str>) -> Intent {
        let text = content.unwrap_or_default().trim();

        for rule in RULES {
            if let Some(caps) = rule.pattern.captures(text) {
                let intent = (rule.extract)(&caps);
                debug!(rule = rule.name, intent = intent.label(), "Message matched intent rule");
                return intent;
            }
        }

        debug!("Message matched no intent rule");
        Intent::Unrecognized
    }
}

/// Simple shape check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_SHAPE.is_match(candidate)
}

fn extract_setup(caps: &Captures<'_>) -> Intent {
    let candidate = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if is_valid_email(candidate) {
        Intent::SetupEmail {
            email: candidate.to_string(),
        }
    } else {
        Intent::Rejected(ValidationError::InvalidEmail {
            candidate: candidate.to_string(),
        })
    }
}

fn extract_status(_caps: &Captures<'_>) -> Intent {
    Intent::StatusCheck
}

fn extract_post(caps: &Captures<'_>) -> Intent {
    let payload = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let Some((submolt, title, content)) = split_post_payload(payload) else {
        return Intent::Rejected(ValidationError::MissingPostArguments);
    };

    let submolt = submolt.trim();
    let title = title.trim();
    let content = content.trim();

    if title.is_empty() || content.is_empty() {
        return Intent::Rejected(ValidationError::MissingPostArguments);
    }

    Intent::CreatePost(PostDraft {
        submolt: if submolt.is_empty() {
            DEFAULT_SUBMOLT.to_string()
        } else {
            submolt.to_string()
        },
        title: title.to_string(),
        content: content.to_string(),
    })
}

/// Split `<submolt>|<title>|<content>` on the first two unescaped pipes.
///
/// `\|` in the first two fields is a literal pipe. The content field is
/// returned verbatim. Returns `None` when fewer than two delimiters exist.
fn split_post_payload(payload: &str) -> Option<(String, String, &str)> {
    let mut fields: Vec<String> = Vec::with_capacity(2);
    let mut current = String::new();
    let mut chars = payload.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' if matches!(chars.peek(), Some((_, '|'))) => {
                chars.next();
                current.push('|');
            }
            '|' => {
                fields.push(std::mem::take(&mut current));
                if fields.len() == 2 {
                    let title = fields.pop()?;
                    let submolt = fields.pop()?;
                    return Some((submolt, title, &payload[i + 1..]));
                }
            }
            _ => current.push(ch),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentMatcher::new().classify(Some(text))
    }

    fn setup(email: &str) -> Intent {
        Intent::SetupEmail {
            email: email.to_string(),
        }
    }

    fn post(submolt: &str, title: &str, content: &str) -> Intent {
        Intent::CreatePost(PostDraft {
            submolt: submolt.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    #[test]
    fn rule_order_is_fixed() {
        assert_eq!(
            IntentMatcher::new().rule_names(),
            vec!["setup-natural", "setup-command", "status", "post"]
        );
    }

    #[test]
    fn setup_natural_form() {
        assert_eq!(
            classify("Set up my email for Moltbook login: owner@example.com"),
            setup("owner@example.com")
        );
    }

    #[test]
    fn setup_natural_form_is_case_insensitive() {
        assert_eq!(
            classify("please SET UP MY EMAIL FOR MOLTBOOK LOGIN:owner@example.com thanks"),
            setup("owner@example.com")
        );
    }

    #[test]
    fn setup_command_form() {
        assert_eq!(
            classify("setup-moltbook owner@example.com"),
            setup("owner@example.com")
        );
        assert_eq!(
            classify("  Setup-Moltbook   owner@example.com  "),
            setup("owner@example.com")
        );
    }

    #[test]
    fn setup_command_found_anywhere_in_text() {
        assert_eq!(classify("xsetup-moltbook a@b.co"), setup("a@b.co"));
        assert_eq!(
            classify("please run setup-moltbook owner@example.com now"),
            setup("owner@example.com")
        );
    }

    #[test]
    fn natural_form_wins_over_command_form() {
        let text = "setup-moltbook first@example.com or Set up my email for Moltbook login: second@example.com";
        assert_eq!(classify(text), setup("second@example.com"));
    }

    #[test]
    fn setup_rejects_malformed_email() {
        for bad in ["not-an-email", "@example.com", "owner@example", "a@b@c.com", "owner@.com"] {
            let intent = classify(&format!("setup-moltbook {bad}"));
            assert_eq!(
                intent,
                Intent::Rejected(ValidationError::InvalidEmail {
                    candidate: bad.to_string()
                }),
                "candidate {bad}"
            );
        }
    }

    #[test]
    fn setup_without_token_is_unrecognized() {
        assert_eq!(classify("setup-moltbook"), Intent::Unrecognized);
        assert_eq!(classify("setup-moltbook    "), Intent::Unrecognized);
    }

    #[test]
    fn status_forms() {
        assert_eq!(classify("moltbook-status"), Intent::StatusCheck);
        assert_eq!(classify("check-moltbook-status"), Intent::StatusCheck);
        assert_eq!(classify("MoltBook-Status"), Intent::StatusCheck);
        assert_eq!(classify("  moltbook-status  "), Intent::StatusCheck);
    }

    #[test]
    fn status_must_be_whole_message() {
        assert_eq!(classify("what is my moltbook-status"), Intent::Unrecognized);
        assert_eq!(classify("moltbook-status please"), Intent::Unrecognized);
    }

    #[test]
    fn post_basic() {
        assert_eq!(
            classify("moltbook-post general|Hello World|This is the body"),
            post("general", "Hello World", "This is the body")
        );
    }

    #[test]
    fn post_content_keeps_extra_pipes() {
        assert_eq!(
            classify("moltbook-post general|Hello World|Body with | pipe inside"),
            post("general", "Hello World", "Body with | pipe inside")
        );
    }

    #[test]
    fn post_fields_are_trimmed() {
        assert_eq!(
            classify("MOLTBOOK-POST  rust  |  A title  |  some text  "),
            post("rust", "A title", "some text")
        );
    }

    #[test]
    fn post_escaped_pipe_in_title() {
        assert_eq!(
            classify(r"moltbook-post general|A \| B|body"),
            post("general", "A | B", "body")
        );
    }

    #[test]
    fn post_content_is_multiline() {
        assert_eq!(
            classify("moltbook-post general|Title|line one\nline two"),
            post("general", "Title", "line one\nline two")
        );
    }

    #[test]
    fn post_empty_submolt_defaults() {
        assert_eq!(
            classify("moltbook-post |Title|Body"),
            post(DEFAULT_SUBMOLT, "Title", "Body")
        );
    }

    #[test]
    fn post_missing_arguments() {
        for text in [
            "moltbook-post general||",
            "moltbook-post general|Title|   ",
            "moltbook-post general| |Body",
            "moltbook-post general|Title",
            "moltbook-post",
        ] {
            assert_eq!(
                classify(text),
                Intent::Rejected(ValidationError::MissingPostArguments),
                "text {text:?}"
            );
        }
    }

    #[test]
    fn post_prefix_must_be_whole_word() {
        assert_eq!(classify("moltbook-postal a|b|c"), Intent::Unrecognized);
        assert_eq!(classify("please moltbook-post a|b|c"), Intent::Unrecognized);
    }

    #[test]
    fn setup_outranks_post() {
        assert_eq!(
            classify("moltbook-post general|Hi|setup-moltbook owner@example.com"),
            setup("owner@example.com")
        );
    }

    #[test]
    fn unrecognized_and_empty() {
        assert_eq!(classify("hello there"), Intent::Unrecognized);
        assert_eq!(classify(""), Intent::Unrecognized);
        assert_eq!(IntentMatcher::new().classify(None), Intent::Unrecognized);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.com"));
    }
}
