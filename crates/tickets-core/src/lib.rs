//! tickets-core library.
//!
//! Ticket model, audit history, and the file-backed [`store::TicketStore`].
//!
//! # Conventions
//!
//! - **Errors**: Store operations return [`error::TicketError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!` for mutations, `debug!` for lookups and I/O).

pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod store;

pub use error::TicketError;
pub use model::{Action, HistoryEntry, Status, Ticket, TicketId};
pub use store::{Assignment, StatusCounts, TicketFilter, TicketStore, TicketUpdate};
