use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex characters in a generated ticket ID.
pub const ID_LEN: usize = 8;

/// Opaque short hex identifier, also used as the ticket's file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Fresh random ID. Callers check for collisions against the store.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{:08x}", rand::random::<u32>()))
    }

    /// Wrap an ID read back from disk without validation.
    #[must_use]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file holding this ticket.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_lowercase_hex() {
        for _ in 0..64 {
            let id = TicketId::generate();
            assert_eq!(id.as_str().len(), ID_LEN);
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            );
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TicketId::new_unchecked("deadbeef");
        assert_eq!(serde_json::to_string(&id).expect("ser"), "\"deadbeef\"");
        assert_eq!(id.file_name(), "deadbeef.json");
    }
}
