//! Marker tables that classify raw action output.
//!
//! The scripts and the Moltbook API communicate results only through text.
//! The markers below are that contract; an upstream wording change breaks
//! classification, so keep these tables in sync with the scripts.
//!
//! | action              | markers, highest priority first                          |
//! |---------------------|----------------------------------------------------------|
//! | `setup_owner_email` | 2xx `HTTP_STATUS`, claim phrase, missing-key phrase      |
//! | `check_status`      | `"status":"claimed"`, `"status":"pending_claim"`, missing-key phrase |
//! | `create_post`       | 2xx `HTTP_STATUS`, claim phrase, missing-key phrase      |
//!
//! Output matching no marker is [`Outcome::Unclassified`].

use std::sync::LazyLock;

use regex::Regex;

use crate::actions::ActionKind;

/// Phrase the API returns while the agent has not been claimed by its owner.
pub const CLAIM_REQUIRED_PHRASE: &str = "Agent must be claimed first";

/// Phrase the scripts print when no API key is configured.
pub const MISSING_API_KEY_PHRASE: &str = "MOLTBOOK_API_KEY is not set";

/// Substrings of a failure description that call for the manual fallback.
const TRANSPORT_INDICATORS: &[&str] = &["econnrefused", "connection refused", "timeout", "timed out"];

static HTTP_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP_STATUS:([0-9]{3})").expect("valid HTTP_STATUS regex"));

static STATUS_CLAIMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""status"\s*:\s*"claimed""#).expect("valid claimed regex")
});

static STATUS_PENDING_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""status"\s*:\s*"pending_claim""#).expect("valid pending_claim regex")
});

/// Classification of a completed action's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ClaimRequired,
    MissingCredential,
    Claimed,
    PendingClaim,
    Unclassified,
}

/// Classification of a collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Unreachable or timed out: point the user at the manual procedure.
    ManualFallback,
    Generic,
}

/// Something to look for in raw output.
#[derive(Debug)]
pub enum Marker {
    /// First `HTTP_STATUS:<code>` is in [200, 300).
    SuccessStatus,
    /// Case-insensitive substring.
    Phrase(&'static str),
    Pattern(&'static LazyLock<Regex>),
}

impl Marker {
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Marker::SuccessStatus => {
                matches!(extract_http_status(raw), Some(code) if (200..300).contains(&code))
            }
            Marker::Phrase(phrase) => raw.to_lowercase().contains(&phrase.to_lowercase()),
            Marker::Pattern(regex) => regex.is_match(raw),
        }
    }
}

/// A marker and the outcome it selects.
#[derive(Debug)]
pub struct MarkerRule {
    pub marker: Marker,
    pub outcome: Outcome,
}

static SETUP_MARKERS: &[MarkerRule] = &[
    MarkerRule {
        marker: Marker::SuccessStatus,
        outcome: Outcome::Success,
    },
    MarkerRule {
        marker: Marker::Phrase(CLAIM_REQUIRED_PHRASE),
        outcome: Outcome::ClaimRequired,
    },
    MarkerRule {
        marker: Marker::Phrase(MISSING_API_KEY_PHRASE),
        outcome: Outcome::MissingCredential,
    },
];

static STATUS_MARKERS: &[MarkerRule] = &[
    MarkerRule {
        marker: Marker::Pattern(&STATUS_CLAIMED),
        outcome: Outcome::Claimed,
    },
    MarkerRule {
        marker: Marker::Pattern(&STATUS_PENDING_CLAIM),
        outcome: Outcome::PendingClaim,
    },
    MarkerRule {
        marker: Marker::Phrase(MISSING_API_KEY_PHRASE),
        outcome: Outcome::MissingCredential,
    },
];

static POST_MARKERS: &[MarkerRule] = &[
    MarkerRule {
        marker: Marker::SuccessStatus,
        outcome: Outcome::Success,
    },
    MarkerRule {
        marker: Marker::Phrase(CLAIM_REQUIRED_PHRASE),
        outcome: Outcome::ClaimRequired,
    },
    MarkerRule {
        marker: Marker::Phrase(MISSING_API_KEY_PHRASE),
        outcome: Outcome::MissingCredential,
    },
];

/// Marker table for an action, in priority order.
pub fn markers_for(kind: ActionKind) -> &'static [MarkerRule] {
    match kind {
        ActionKind::SetupOwnerEmail => SETUP_MARKERS,
        ActionKind::CheckStatus => STATUS_MARKERS,
        ActionKind::CreatePost => POST_MARKERS,
    }
}

/// First `HTTP_STATUS:<3 digits>` code in the output.
pub fn extract_http_status(raw: &str) -> Option<u16> {
    HTTP_STATUS
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Classify a completed action's raw output. First matching marker wins.
pub fn classify_output(kind: ActionKind, raw: &str) -> Outcome {
    markers_for(kind)
        .iter()
        .find(|rule| rule.marker.matches(raw))
        .map(|rule| rule.outcome)
        .unwrap_or(Outcome::Unclassified)
}

/// Classify a collaborator failure by its description.
pub fn classify_failure(description: &str) -> FailureOutcome {
    let lower = description.to_lowercase();
    if TRANSPORT_INDICATORS.iter().any(|i| lower.contains(i)) {
        FailureOutcome::ManualFallback
    } else {
        FailureOutcome::Generic
    }
}
