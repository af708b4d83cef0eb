pub mod history;
pub mod status;
pub mod ticket;
pub mod ticket_id;
pub mod timestamp;

pub use history::{Action, HistoryEntry};
pub use status::{ParseStatusError, Status};
pub use ticket::Ticket;
pub use ticket_id::TicketId;
