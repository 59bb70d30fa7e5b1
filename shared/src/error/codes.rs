//! Unified error codes for the rental backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Wheelchair errors
//! - 8xxx: Admin user errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so the web frontend can switch on it without
/// parsing the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (malformed JSON, unparsable parameter)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// No access token supplied
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Token subject no longer maps to a live account
    AccountDisabled = 1007,
    /// Old password did not match on password change
    OldPasswordIncorrect = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Operator (or admin) role required
    OperatorRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Formal order not found
    OrderNotFound = 4001,
    /// Unknown order status value
    InvalidOrderStatus = 4002,
    /// Status update would not change anything
    OrderStatusUnchanged = 4003,
    /// Pre-order id missing from request
    PreOrderIdRequired = 4101,
    /// Pre-order not found
    PreOrderNotFound = 4102,
    /// Pre-order older than its hold window
    PreOrderExpired = 4103,

    // ==================== 6xxx: Wheelchair ====================
    /// Wheelchair not found
    WheelchairNotFound = 6001,
    /// Wheelchair missing, deleted or offline
    WheelchairUnavailable = 6002,
    /// Wheelchair is offline
    WheelchairOffline = 6003,
    /// No stock left
    WheelchairOutOfStock = 6004,
    /// Price must be positive
    WheelchairInvalidPrice = 6005,
    /// Stock must not be negative
    WheelchairInvalidStock = 6006,
    /// Unknown inventory operation
    InvalidOperateType = 6007,

    // ==================== 8xxx: Admin user ====================
    /// Admin user not found
    UserNotFound = 8001,
    /// Username already taken by a non-deleted user
    UsernameExists = 8002,
    /// Admin attempted to delete their own account
    CannotDeleteSelf = 8003,
    /// Unknown role value
    InvalidRole = 8004,
    /// New user requires a password
    PasswordRequired = 8005,
    /// Change would leave no live admin account
    LastAdminRequired = 8006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default user-facing message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "操作成功",
            ErrorCode::Unknown => "操作失败",
            ErrorCode::ValidationFailed => "参数校验失败",
            ErrorCode::NotFound => "请求的资源不存在",
            ErrorCode::AlreadyExists => "资源已存在",
            ErrorCode::InvalidRequest => "无效的请求",
            ErrorCode::InvalidFormat => "数据格式错误",
            ErrorCode::RequiredField => "缺少必需字段",
            ErrorCode::ValueOutOfRange => "数值超出范围",

            // Auth
            ErrorCode::NotAuthenticated => "需要提供访问令牌",
            ErrorCode::InvalidCredentials => "用户名或密码错误",
            ErrorCode::TokenExpired => "令牌已过期，请重新登录",
            ErrorCode::TokenInvalid => "无效的令牌",
            ErrorCode::AccountDisabled => "用户不存在或已被删除",
            ErrorCode::OldPasswordIncorrect => "原密码错误",

            // Permission
            ErrorCode::PermissionDenied => "权限不足",
            ErrorCode::OperatorRequired => "需要操作员权限",
            ErrorCode::AdminRequired => "需要管理员权限",

            // Order
            ErrorCode::OrderNotFound => "订单不存在",
            ErrorCode::InvalidOrderStatus => "无效的订单状态",
            ErrorCode::OrderStatusUnchanged => "订单状态未变化",
            ErrorCode::PreOrderIdRequired => "缺少预订单ID",
            ErrorCode::PreOrderNotFound => "预订单不存在",
            ErrorCode::PreOrderExpired => "预订单已过期，请重新下单",

            // Wheelchair
            ErrorCode::WheelchairNotFound => "轮椅不存在",
            ErrorCode::WheelchairUnavailable => "轮椅不存在或已下架",
            ErrorCode::WheelchairOffline => "轮椅已下架",
            ErrorCode::WheelchairOutOfStock => "轮椅库存不足",
            ErrorCode::WheelchairInvalidPrice => "价格必须大于0",
            ErrorCode::WheelchairInvalidStock => "库存不能为负数",
            ErrorCode::InvalidOperateType => "无效的操作类型",

            // Admin user
            ErrorCode::UserNotFound => "用户不存在",
            ErrorCode::UsernameExists => "用户名已存在",
            ErrorCode::CannotDeleteSelf => "不能删除当前登录用户",
            ErrorCode::InvalidRole => "无效的角色",
            ErrorCode::PasswordRequired => "新增用户时密码不能为空",
            ErrorCode::LastAdminRequired => "至少需要保留一个管理员账号",

            // System
            ErrorCode::InternalError => "服务器内部错误",
            ErrorCode::DatabaseError => "数据库错误",
            ErrorCode::ConfigError => "配置错误",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::OldPasswordIncorrect),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::OperatorRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidOrderStatus),
            4003 => Ok(ErrorCode::OrderStatusUnchanged),
            4101 => Ok(ErrorCode::PreOrderIdRequired),
            4102 => Ok(ErrorCode::PreOrderNotFound),
            4103 => Ok(ErrorCode::PreOrderExpired),

            // Wheelchair
            6001 => Ok(ErrorCode::WheelchairNotFound),
            6002 => Ok(ErrorCode::WheelchairUnavailable),
            6003 => Ok(ErrorCode::WheelchairOffline),
            6004 => Ok(ErrorCode::WheelchairOutOfStock),
            6005 => Ok(ErrorCode::WheelchairInvalidPrice),
            6006 => Ok(ErrorCode::WheelchairInvalidStock),
            6007 => Ok(ErrorCode::InvalidOperateType),

            // Admin user
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),
            8003 => Ok(ErrorCode::CannotDeleteSelf),
            8004 => Ok(ErrorCode::InvalidRole),
            8005 => Ok(ErrorCode::PasswordRequired),
            8006 => Ok(ErrorCode::LastAdminRequired),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
