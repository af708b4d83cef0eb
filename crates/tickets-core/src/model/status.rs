use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ErrorCode;

/// The five lifecycle states of a ticket.
///
/// Any state may move to any other through an explicit update. The only
/// automatic transition is `open -> in-progress` when a worker is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Blocked,
    Waiting,
    Done,
}

impl Status {
    /// Every status in display order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Blocked,
        Self::Waiting,
        Self::Done,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Blocked => "blocked",
            Self::Waiting => "waiting",
            Self::Done => "done",
        }
    }

    /// Single-glyph marker used in list and show output.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Open => "○",
            Self::InProgress => "◐",
            Self::Blocked => "✗",
            Self::Waiting => "⏳",
            Self::Done => "✓",
        }
    }

    /// Icon for a raw status string, `?` for anything outside the enum.
    #[must_use]
    pub fn icon_for(raw: &str) -> &'static str {
        raw.parse::<Self>().map_or("?", Self::icon)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub value: String,
}

impl ParseStatusError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidStatus
    }
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid status '{}': expected one of open, in-progress, blocked, waiting, done",
            self.value
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                value: s.to_string(),
            })
    }
}
