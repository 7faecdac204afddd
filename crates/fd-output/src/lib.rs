//! `fd-output` — persisting the assignment audit trail.
//!
//! The dispatcher keeps the trail in memory; this crate writes it out as it
//! grows, one row per fired event, in firing order.
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`writer`]   | the `AuditWriter` trait                             |
//! | [`csv`]      | CSV backend (always available)                      |
//! | [`sqlite`]   | SQLite backend (feature `sqlite`)                   |
//! | [`observer`] | `AuditObserver` — bridges `FleetObserver` to a writer |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                    |

pub mod csv;
pub mod error;
pub mod observer;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvAuditWriter;
pub use error::{OutputError, OutputResult};
pub use observer::AuditObserver;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAuditWriter;
pub use writer::AuditWriter;
