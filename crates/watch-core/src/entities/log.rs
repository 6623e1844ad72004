//! Change-log entities and legacy log-parameter parsing

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{PageId, PageIdentity, UserId};

/// Administrative log kinds excluded from pending-review change windows
pub const EXCLUDED_LOG_KINDS: [&str; 5] = ["interwiki", "newusers", "patrol", "rights", "upload"];

/// Log kinds that explain why a watched page no longer exists. A page
/// disappears when it is explicitly deleted or moved without a redirect.
pub const DELETION_LOG_KINDS: [&str; 2] = ["delete", "move"];

/// One entry in the wiki's change log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub id: i64,
    /// Log kind tag, e.g. `delete`, `move`, `protect`
    pub kind: String,
    /// Action within the kind, e.g. `move_redir`
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub actor: UserId,
    pub page: PageIdentity,
    /// Page row ID, when the logged page still exists
    pub page_id: Option<PageId>,
    /// Raw serialized parameters; for move events, holds the target title
    pub params: String,
    pub comment: String,
}

impl LogEvent {
    pub fn is_move(&self) -> bool {
        self.kind == "move"
    }

    /// Extract the move target from this event's parameters, degrading to
    /// `None` when both known serialization formats fail to parse.
    pub fn move_target(&self) -> Option<String> {
        if !self.is_move() {
            return None;
        }
        parse_move_target(&self.params).ok()
    }
}

/// Parse a move target out of serialized log parameters.
///
/// Two historical formats exist and neither is authoritative:
/// 1. a structured JSON object keyed `4::target`
/// 2. a legacy newline-delimited list with the target in the first line
///
/// The structured parse is attempted first; on failure the delimited form is
/// tried. An empty or unusable value is `MalformedLogParameters`.
pub fn parse_move_target(params: &str) -> Result<String, DomainError> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(params) {
        if let Some(target) = value.get("4::target").and_then(|t| t.as_str()) {
            return Ok(target.to_string());
        }
        // Parsed as JSON but not the shape we know; fall through to the
        // delimited format rather than assuming one shape is authoritative.
    }

    let first = params
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    match first {
        Some(target) => Ok(target.to_string()),
        None => Err(DomainError::MalformedLogParameters(params.to_string())),
    }
}
