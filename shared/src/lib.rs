//! Shared types for the wheelchair rental backend
//!
//! Common types used by the server and its API consumers: the unified
//! error system, the response envelope, domain models and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{PaginatedResponse, Pagination};
