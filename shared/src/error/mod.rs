//! Unified error system for the rental backend
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized business error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: The `{code, message, data}` envelope every endpoint returns
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors (formal and pre-orders)
//! - 6xxx: Wheelchair errors
//! - 8xxx: Admin user errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::OrderNotFound);
//!
//! // Create an error with custom message
//! let err = AppError::validation("手机号格式不正确");
//!
//! // Create an error with details
//! let err = AppError::validation("缺少必需字段: phone")
//!     .with_detail("fields", "phone");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, 400);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
