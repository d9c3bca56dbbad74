//! Status History
//!
//! Append-only audit trail of order and payment status changes. Entries are written inside the
//! transaction that makes the change, so a failed write aborts the change itself.

pub mod records;
mod repository;

pub(crate) use repository::{NewHistoryEntry, PgHistoryRepository};
