use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::history::{Action, HistoryEntry};
use super::status::Status;
use super::ticket_id::TicketId;
use super::timestamp;

/// A tracked unit of delegated work and its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub body: String,
    pub status: Status,
    pub assigned_to: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub history: Vec<HistoryEntry>,
}

impl Ticket {
    /// A new `open`, unassigned ticket whose history holds one `created` entry.
    #[must_use]
    pub fn new(
        id: TicketId,
        title: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            status: Status::Open,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            history: vec![HistoryEntry::new(now, Action::created())],
        }
    }

    /// Append a history entry and bump `updated_at`.
    pub fn record(&mut self, at: DateTime<Utc>, action: Action) {
        self.history.push(HistoryEntry::new(at, action));
        self.updated_at = at;
    }

    /// Set the status, recording the transition.
    pub fn set_status(&mut self, at: DateTime<Utc>, to: Status) {
        let from = self.status;
        self.status = to;
        self.record(at, Action::StatusChange { from, to });
    }

    /// Assign a worker; an `open` ticket moves to `in-progress`.
    ///
    /// Returns the previous assignee.
    pub fn assign(&mut self, at: DateTime<Utc>, worker: &str) -> Option<String> {
        let previous = self.assigned_to.replace(worker.to_string());
        self.record(at, Action::assigned(worker));
        if self.status == Status::Open {
            self.set_status(at, Status::InProgress);
        }
        previous
    }

    pub fn set_body(&mut self, at: DateTime<Utc>, body: impl Into<String>) {
        self.body = body.into();
        self.record(at, Action::body_changed());
    }

    pub fn set_title(&mut self, at: DateTime<Utc>, title: impl Into<String>) {
        let title = title.into();
        let action = Action::title_changed(&self.title, &title);
        self.title = title;
        self.record(at, action);
    }

    pub fn comment(&mut self, at: DateTime<Utc>, text: impl Into<String>) {
        self.record(
            at,
            Action::Comment {
                details: text.into(),
            },
        );
    }

    /// Worker name, or `unassigned`.
    #[must_use]
    pub fn assignee_label(&self) -> &str {
        self.assigned_to.as_deref().unwrap_or("unassigned")
    }
}
