use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::Status;
use super::timestamp;

/// One immutable line of a ticket's audit trail.
///
/// Serialized flat, with the `action` tag next to the timestamp:
/// `{"timestamp": "...", "action": "status_change", "from": "open", "to": "done"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub action: Action,
}

impl HistoryEntry {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, action: Action) -> Self {
        Self { timestamp, action }
    }
}

/// What happened, with the payload each kind of change carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Created { details: String },
    Assigned { details: String },
    StatusChange { from: Status, to: Status },
    Updated { details: String },
    Comment { details: String },
}

impl Action {
    pub(crate) fn created() -> Self {
        Self::Created {
            details: "Ticket created".to_string(),
        }
    }

    pub(crate) fn assigned(worker: &str) -> Self {
        Self::Assigned {
            details: format!("Assigned to {worker}"),
        }
    }

    pub(crate) fn title_changed(old: &str, new: &str) -> Self {
        Self::Updated {
            details: format!("Title: '{old}' -> '{new}'"),
        }
    }

    pub(crate) fn body_changed() -> Self {
        Self::Updated {
            details: "Description updated".to_string(),
        }
    }

    /// The `action` tag as written to disk.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Assigned { .. } => "assigned",
            Self::StatusChange { .. } => "status_change",
            Self::Updated { .. } => "updated",
            Self::Comment { .. } => "comment",
        }
    }

    /// Human summary of the payload: `from -> to` or the free-text details.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::StatusChange { from, to } => format!("{from} -> {to}"),
            Self::Created { details }
            | Self::Assigned { details }
            | Self::Updated { details }
            | Self::Comment { details } => details.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
            .expect("valid")
            .with_timezone(&Utc)
    }

    #[test]
    fn status_change_serializes_flat() {
        let entry = HistoryEntry::new(
            at(),
            Action::StatusChange {
                from: Status::Open,
                to: Status::InProgress,
            },
        );
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(
            value,
            json!({
                "timestamp": "2025-01-02T03:04:05Z",
                "action": "status_change",
                "from": "open",
                "to": "in-progress",
            })
        );
    }

    #[test]
    fn detail_entries_parse_from_existing_files() {
        let raw = r#"{"timestamp": "2025-01-02T03:04:05Z", "action": "comment", "details": "50% done"}"#;
        let entry: HistoryEntry = serde_json::from_str(raw).expect("parse");
        assert_eq!(entry.timestamp, at());
        assert_eq!(
            entry.action,
            Action::Comment {
                details: "50% done".into()
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        let raw = r#"{"timestamp": "2025-01-02T03:04:05Z", "action": "archived", "details": "x"}"#;
        assert!(serde_json::from_str::<HistoryEntry>(raw).is_err());
    }

    #[test]
    fn summaries_match_show_output() {
        assert_eq!(
            Action::StatusChange {
                from: Status::Blocked,
                to: Status::Done
            }
            .summary(),
            "blocked -> done"
        );
        assert_eq!(Action::assigned("alice").summary(), "Assigned to alice");
        assert_eq!(
            Action::title_changed("Old", "New").summary(),
            "Title: 'Old' -> 'New'"
        );
        assert_eq!(Action::created().name(), "created");
    }
}
