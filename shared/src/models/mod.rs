//! Data models
//!
//! Shared between the server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Numeric IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix millis.

pub mod admin_user;
pub mod operation_log;
pub mod order;
pub mod page;
pub mod wheelchair;

// Re-exports
pub use admin_user::*;
pub use operation_log::*;
pub use order::*;
pub use page::*;
pub use wheelchair::*;
