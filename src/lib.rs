//! Single-user trading performance journal.
//!
//! The crate splits into a pure calculation/aggregation core ([`calc`],
//! [`stats`]) that operates on immutable snapshots, and a thin operation
//! layer ([`commands`]) that owns the SQLite-backed ledger ([`db`]) and
//! feeds the core. UI and chart rendering live outside this crate and
//! consume the command layer's output verbatim.

pub mod calc;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod stats;

pub use db::Database;
pub use error::{JournalError, Result};
