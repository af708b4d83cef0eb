//! File-backed ticket store: one pretty-printed JSON document per ticket.
//!
//! Layout of the store directory:
//!
//! ```text
//! <dir>/
//!   .lock                 advisory lock (shared for reads, exclusive for writes)
//!   <id>.json             one ticket per file, stem == ticket id
//!   .<id>.json.tmp        transient, renamed over <id>.json on save
//! ```
//!
//! Every operation is a blocking read-modify-write. Mutations hold the
//! exclusive lock for their whole duration, so two concurrent `tickets`
//! processes never interleave a load and a save.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::TicketError;
use crate::lock::{StoreReadLock, StoreWriteLock};
use crate::model::{Status, Ticket, TicketId, timestamp};

pub type Result<T> = std::result::Result<T, TicketError>;

const LOCK_FILE: &str = ".lock";
const TICKET_EXT: &str = "json";
const MAX_ID_ATTEMPTS: usize = 16;

/// Equality filters applied by [`TicketStore::list`]. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<Status>,
    pub assigned_to: Option<String>,
}

impl TicketFilter {
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let status_ok = self.status.is_none_or(|s| s == ticket.status);
        let worker_ok = self
            .assigned_to
            .as_deref()
            .is_none_or(|w| ticket.assigned_to.as_deref() == Some(w));
        status_ok && worker_ok
    }
}

/// Field changes for [`TicketStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    pub status: Option<Status>,
    pub body: Option<String>,
    pub title: Option<String>,
}

impl TicketUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.body.is_none() && self.title.is_none()
    }
}

/// Result of [`TicketStore::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub ticket: Ticket,
    /// Assignee before this call, if any.
    pub previous: Option<String>,
    /// True when the call moved the ticket from `open` to `in-progress`.
    pub started: bool,
}

/// Per-status tally produced by [`TicketStore::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    /// All five statuses, zero counts included.
    pub by_status: BTreeMap<Status, usize>,
    /// Literal status values on disk that are not one of the five.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unknown: BTreeMap<String, usize>,
}

impl StatusCounts {
    fn empty() -> Self {
        Self {
            total: 0,
            by_status: Status::ALL.into_iter().map(|s| (s, 0)).collect(),
            unknown: BTreeMap::new(),
        }
    }

    fn tally(&mut self, raw: &str) {
        match raw.parse::<Status>() {
            Ok(status) => *self.by_status.entry(status).or_default() += 1,
            Err(_) => *self.unknown.entry(raw.to_string()).or_default() += 1,
        }
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// `(status, count)` pairs: known statuses in lifecycle order, then unknown ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_status
            .iter()
            .map(|(status, count)| (status.as_str(), *count))
            .chain(self.unknown.iter().map(|(raw, count)| (raw.as_str(), *count)))
    }
}

#[derive(Deserialize)]
struct StatusOnly {
    status: String,
}

/// Handle on a ticket directory. Cheap to construct; holds no open files.
#[derive(Debug, Clone)]
pub struct TicketStore {
    dir: PathBuf,
    lock_timeout: Duration,
}

impl TicketStore {
    /// Open (creating if necessary) the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Io`] if the directory cannot be created.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.dir).map_err(|e| TicketError::io(&config.dir, e))?;
        debug!(dir = %config.dir.display(), "opened ticket store");
        Ok(Self {
            dir: config.dir.clone(),
            lock_timeout: config.lock_timeout,
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `id`.
    #[must_use]
    pub fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Create a ticket, optionally assigning it straight away.
    ///
    /// With an assignee the history reads `created, assigned, status_change`
    /// and the ticket starts `in-progress`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Lock`] on lock timeout and [`TicketError::Io`]
    /// if no free ID is found or the file cannot be written.
    pub fn create(&self, title: &str, body: &str, assign: Option<&str>) -> Result<Ticket> {
        let _lock = self.write_lock()?;
        let id = self.fresh_id()?;
        let now = timestamp::now();

        let mut ticket = Ticket::new(id, title, body, now);
        if let Some(worker) = assign {
            ticket.assign(now, worker);
        }

        self.save(&ticket)?;
        info!(id = %ticket.id, assigned_to = ?ticket.assigned_to, "created ticket");
        Ok(ticket)
    }

    /// Resolve an ID prefix to exactly one stored ticket ID.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotFound`] when nothing matches and
    /// [`TicketError::Ambiguous`] when more than one ID does.
    pub fn resolve(&self, partial_id: &str) -> Result<TicketId> {
        let _lock = self.read_lock()?;
        self.resolve_unlocked(partial_id)
    }

    /// Load a ticket by ID prefix. Read-only.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`Self::resolve`], plus
    /// [`TicketError::Corrupt`] if the document does not parse.
    pub fn show(&self, partial_id: &str) -> Result<Ticket> {
        let _lock = self.read_lock()?;
        let id = self.resolve_unlocked(partial_id)?;
        self.load(&id)
    }

    /// All tickets matching `filter`, ordered by ID.
    ///
    /// # Errors
    ///
    /// Any unreadable or corrupt ticket file fails the whole listing.
    pub fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let _lock = self.read_lock()?;
        let mut tickets = Vec::new();
        for id in self.ticket_ids()? {
            let ticket = self.load(&id)?;
            if filter.matches(&ticket) {
                tickets.push(ticket);
            }
        }
        debug!(count = tickets.len(), ?filter, "listed tickets");
        Ok(tickets)
    }

    /// Apply status, body and title changes in that order, one history entry each.
    ///
    /// # Errors
    ///
    /// Fails with [`TicketError::InvalidArgument`] before touching disk when
    /// `changes` is empty; otherwise as for [`Self::show`], plus write failures.
    pub fn update(&self, partial_id: &str, changes: &TicketUpdate) -> Result<Ticket> {
        if changes.is_empty() {
            return Err(TicketError::InvalidArgument(
                "Provide at least one update: --status, --body, or --title".to_string(),
            ));
        }

        let (ticket, ()) = self.mutate(partial_id, |ticket, now| {
            if let Some(status) = changes.status {
                ticket.set_status(now, status);
            }
            if let Some(ref body) = changes.body {
                ticket.set_body(now, body.clone());
            }
            if let Some(ref title) = changes.title {
                ticket.set_title(now, title.clone());
            }
        })?;
        info!(id = %ticket.id, status = %ticket.status, "updated ticket");
        Ok(ticket)
    }

    /// Assign `worker`, replacing any previous assignee.
    ///
    /// # Errors
    ///
    /// Resolution, lock, and storage errors as for [`Self::update`].
    pub fn assign(&self, partial_id: &str, worker: &str) -> Result<Assignment> {
        let (ticket, (previous, started)) = self.mutate(partial_id, |ticket, now| {
            let was_open = ticket.status == Status::Open;
            let previous = ticket.assign(now, worker);
            (previous, was_open)
        })?;
        info!(id = %ticket.id, worker, ?previous, "assigned ticket");
        Ok(Assignment {
            ticket,
            previous,
            started,
        })
    }

    /// Append a comment to the ticket's history.
    ///
    /// # Errors
    ///
    /// Resolution, lock, and storage errors as for [`Self::update`].
    pub fn comment(&self, partial_id: &str, text: &str) -> Result<Ticket> {
        let (ticket, ()) = self.mutate(partial_id, |ticket, now| ticket.comment(now, text))?;
        info!(id = %ticket.id, "commented on ticket");
        Ok(ticket)
    }

    /// Permanently remove a ticket, returning it as last stored.
    ///
    /// # Errors
    ///
    /// Resolution errors, [`TicketError::Corrupt`] for an unreadable document,
    /// and [`TicketError::Io`] if the file cannot be removed.
    pub fn delete(&self, partial_id: &str) -> Result<Ticket> {
        let _lock = self.write_lock()?;
        let id = self.resolve_unlocked(partial_id)?;
        let ticket = self.load(&id)?;
        let path = self.ticket_path(&id);
        fs::remove_file(&path).map_err(|e| TicketError::io(&path, e))?;
        info!(id = %id, "deleted ticket");
        Ok(ticket)
    }

    /// Count tickets per status.
    ///
    /// Only the `status` field is read, so a value outside the five statuses
    /// is tallied under its literal text instead of failing the whole report.
    ///
    /// # Errors
    ///
    /// Malformed JSON is still [`TicketError::Corrupt`].
    pub fn stats(&self) -> Result<StatusCounts> {
        let _lock = self.read_lock()?;
        let mut counts = StatusCounts::empty();
        for id in self.ticket_ids()? {
            let path = self.ticket_path(&id);
            let raw = fs::read(&path).map_err(|e| TicketError::io(&path, e))?;
            let status_only: StatusOnly = serde_json::from_slice(&raw)
                .map_err(|source| TicketError::Corrupt { path, source })?;
            counts.tally(&status_only.status);
        }
        Ok(counts)
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn write_lock(&self) -> Result<StoreWriteLock> {
        Ok(StoreWriteLock::acquire(&self.lock_path(), self.lock_timeout)?)
    }

    fn read_lock(&self) -> Result<StoreReadLock> {
        Ok(StoreReadLock::acquire(&self.lock_path(), self.lock_timeout)?)
    }

    /// Locked resolve-load-change-save cycle shared by the mutating operations.
    fn mutate<T>(
        &self,
        partial_id: &str,
        change: impl FnOnce(&mut Ticket, DateTime<Utc>) -> T,
    ) -> Result<(Ticket, T)> {
        let _lock = self.write_lock()?;
        let id = self.resolve_unlocked(partial_id)?;
        let mut ticket = self.load(&id)?;
        let out = change(&mut ticket, timestamp::now());
        self.save(&ticket)?;
        Ok((ticket, out))
    }

    fn resolve_unlocked(&self, partial_id: &str) -> Result<TicketId> {
        let mut matches: Vec<TicketId> = self
            .ticket_ids()?
            .into_iter()
            .filter(|id| id.as_str().starts_with(partial_id))
            .collect();

        debug!(prefix = partial_id, matches = matches.len(), "resolved ticket prefix");
        match matches.len() {
            0 => Err(TicketError::NotFound {
                prefix: partial_id.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(TicketError::Ambiguous {
                prefix: partial_id.to_string(),
                candidates: matches.into_iter().map(|id| id.to_string()).collect(),
            }),
        }
    }

    /// Stored ticket IDs, sorted.
    fn ticket_ids(&self) -> Result<Vec<TicketId>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| TicketError::io(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TicketError::io(&self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TICKET_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') || !path.is_file() {
                continue;
            }
            ids.push(TicketId::new_unchecked(stem));
        }
        ids.sort();
        Ok(ids)
    }

    fn fresh_id(&self) -> Result<TicketId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = TicketId::generate();
            if !self.ticket_path(&id).exists() {
                return Ok(id);
            }
            debug!(id = %id, "generated ticket id already taken, retrying");
        }
        Err(TicketError::io(
            &self.dir,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "could not generate an unused ticket id",
            ),
        ))
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        let path = self.ticket_path(id);
        let raw = fs::read(&path).map_err(|e| TicketError::io(&path, e))?;
        serde_json::from_slice(&raw).map_err(|source| TicketError::Corrupt { path, source })
    }

    /// Write the full document to a temp file, then rename it into place.
    fn save(&self, ticket: &Ticket) -> Result<()> {
        let path = self.ticket_path(&ticket.id);
        let tmp = self.dir.join(format!(".{}.tmp", ticket.id.file_name()));

        let mut encoded = serde_json::to_vec_pretty(ticket).map_err(|source| {
            TicketError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        encoded.push(b'\n');

        let write = || -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&encoded)?;
            file.sync_all()
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(TicketError::io(&tmp, e));
        }

        fs::rename(&tmp, &path).map_err(|e| TicketError::io(&path, e))?;
        debug!(path = %path.display(), history = ticket.history.len(), "saved ticket");
        Ok(())
    }
}
