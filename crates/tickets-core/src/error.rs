use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::lock::LockError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TicketNotFound,
    AmbiguousId,
    InvalidArgument,
    InvalidStatus,
    CorruptTicket,
    TicketWriteFailed,
    LockContention,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::TicketNotFound => "E2001",
            Self::AmbiguousId => "E2004",
            Self::InvalidArgument => "E2006",
            Self::InvalidStatus => "E2005",
            Self::CorruptTicket => "E3003",
            Self::TicketWriteFailed => "E5001",
            Self::LockContention => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TicketNotFound => "Ticket not found",
            Self::AmbiguousId => "Ambiguous ticket ID",
            Self::InvalidArgument => "Invalid argument",
            Self::InvalidStatus => "Invalid status value",
            Self::CorruptTicket => "Corrupt ticket file",
            Self::TicketWriteFailed => "Ticket file read/write failed",
            Self::LockContention => "Lock contention",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in tickets.toml and retry."),
            Self::TicketNotFound => Some("Check the ticket ID with `tickets list`."),
            Self::AmbiguousId => Some("Use a longer ID prefix to disambiguate."),
            Self::InvalidArgument => None,
            Self::InvalidStatus => {
                Some("Use one of: open, in-progress, blocked, waiting, done.")
            }
            Self::CorruptTicket => {
                Some("Inspect the ticket file by hand; it is never repaired automatically.")
            }
            Self::TicketWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => {
                Some("Retry after the other `tickets` process releases its lock.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Every way a ticket store operation can fail.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Ticket not found: {prefix}")]
    NotFound { prefix: String },

    #[error("Ambiguous ID '{prefix}', matches: {}", candidates.join(", "))]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt ticket file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl TicketError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::TicketNotFound,
            Self::Ambiguous { .. } => ErrorCode::AmbiguousId,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io { .. } => ErrorCode::TicketWriteFailed,
            Self::Corrupt { .. } => ErrorCode::CorruptTicket,
            Self::Lock(err) => err.code(),
        }
    }

    /// Remediation text shown next to the error message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::Ambiguous { candidates, .. } => format!(
                "Use a longer ID prefix; candidates are {}",
                candidates.join(", ")
            ),
            other => other
                .code()
                .hint()
                .unwrap_or_else(|| other.code().message())
                .to_string(),
        }
    }

    /// True for failures of the underlying storage rather than of the request.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Corrupt { .. } | Self::Lock(_))
    }
}
