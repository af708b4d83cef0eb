use crate::output::CliError;
use tickets_core::Status;
use tickets_core::model::ParseStatusError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_WORKER_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
            code,
        }
    }

    pub fn to_cli_error(&self) -> CliError {
        CliError::with_details(
            format!("invalid {} '{}': {}", self.field, self.value, self.reason),
            self.suggestion.clone(),
            self.code,
        )
    }
}

pub fn validate_title(s: &str) -> Result<(), ValidationError> {
    if s.trim() != s {
        return Err(ValidationError::new(
            "title",
            s,
            "must not start or end with whitespace",
            "trim leading/trailing whitespace from the title",
            "invalid_title",
        ));
    }
    if s.is_empty() {
        return Err(ValidationError::new(
            "title",
            s,
            "must not be empty",
            "provide a non-empty title",
            "invalid_title",
        ));
    }
    if s.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::new(
            "title",
            s,
            format!("must be <= {MAX_TITLE_LEN} characters"),
            "shorten the title and move details into --body",
            "invalid_title",
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "title",
            s,
            "must not contain control characters",
            "remove control characters from the title",
            "invalid_title",
        ));
    }
    Ok(())
}

pub fn validate_ticket_id(s: &str) -> Result<(), ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::new(
            "ticket_id",
            s,
            "must not be empty",
            "use an ID like 3f2a9c1e or a prefix like 3f2a",
            "invalid_ticket_id",
        ));
    }
    if value != s || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new(
            "ticket_id",
            s,
            "must be an alphanumeric ID or ID prefix",
            "copy the ID from `tickets list`",
            "invalid_ticket_id",
        ));
    }
    Ok(())
}

pub fn validate_worker(s: &str) -> Result<(), ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::new(
            "worker",
            s,
            "must not be empty",
            "pass the worker session name, e.g. auth-worker",
            "invalid_worker",
        ));
    }
    if s.chars().count() > MAX_WORKER_LEN {
        return Err(ValidationError::new(
            "worker",
            s,
            format!("must be <= {MAX_WORKER_LEN} characters"),
            "use a shorter worker name",
            "invalid_worker",
        ));
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::new(
            "worker",
            s,
            "must not contain whitespace",
            "use dashes instead of spaces, e.g. test-worker",
            "invalid_worker",
        ));
    }
    Ok(())
}

pub fn validate_status(s: &str) -> Result<Status, ValidationError> {
    s.parse().map_err(|e: ParseStatusError| {
        let code = e.code();
        ValidationError::new(
            "status",
            s,
            "expected one of open, in-progress, blocked, waiting, done",
            code.hint().unwrap_or_else(|| code.message()),
            code.code(),
        )
    })
}
