//! Input validation helpers
//!
//! Centralized length limits and validation functions shared by the client
//! and admin handlers. Lengths are counted in characters, not bytes, since
//! most names and addresses are Chinese text.

use std::sync::LazyLock;

use regex::Regex;
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Wheelchair names and customer names
pub const MAX_NAME_LEN: usize = 100;

/// Manufacturer names
pub const MAX_MANUFACTURER_LEN: usize = 100;

/// Wheelchair descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Admin usernames
pub const MAX_USERNAME_LEN: usize = 50;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 50;

// ── Numeric limits ──────────────────────────────────────────────────

pub const MAX_PRICE: f64 = 999_999.0;
pub const MAX_STOCK: i64 = 99_999;

/// 中国大陆手机号: 1 开头，第二位 3-9，共 11 位
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern is valid"));

// ── Required fields ─────────────────────────────────────────────────

/// Trimmed, non-empty view of an optional string field
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Report every missing field at once (`缺少必需字段: a, b`)
///
/// Each entry is `(field_name, is_present)`.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::missing_fields(&missing))
    }
}

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a string is within the length limit.
pub fn validate_text_len(value: &str, label: &str, max_len: usize) -> Result<(), AppError> {
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{label}长度不能超过{max_len}个字符"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    label: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_text_len(v, label, max_len)?;
    }
    Ok(())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    if !is_valid_phone(phone) {
        return Err(AppError::validation("手机号格式不正确"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "密码长度至少{MIN_PASSWORD_LEN}位"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "密码长度不能超过{MAX_PASSWORD_LEN}位"
        )));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::new(ErrorCode::WheelchairInvalidPrice));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "价格不能超过999999",
        ));
    }
    Ok(())
}

pub fn validate_stock(stock: i64) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::new(ErrorCode::WheelchairInvalidStock));
    }
    if stock > MAX_STOCK {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "库存不能超过99999",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("13800138000"));
        assert!(is_valid_phone("19912345678"));
        assert!(!is_valid_phone("12800138000"));
        assert!(!is_valid_phone("1380013800"));
        assert!(!is_valid_phone("138001380001"));
        assert!(!is_valid_phone("23800138000"));
        assert!(!is_valid_phone("1380013800a"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_present_trims() {
        assert_eq!(present(&Some("  张三 ".into())), Some("张三"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }

    #[test]
    fn test_require_fields_lists_all_missing() {
        assert!(require_fields(&[("name", true), ("phone", true)]).is_ok());

        let err = require_fields(&[("name", false), ("phone", true), ("address", false)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "缺少必需字段: name, address");
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(999_999.0).is_ok());
        assert_eq!(
            validate_price(0.0).unwrap_err().code,
            ErrorCode::WheelchairInvalidPrice
        );
        assert_eq!(
            validate_price(-5.0).unwrap_err().code,
            ErrorCode::WheelchairInvalidPrice
        );
        assert_eq!(
            validate_price(f64::NAN).unwrap_err().code,
            ErrorCode::WheelchairInvalidPrice
        );
        assert_eq!(
            validate_price(1_000_000.0).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_stock_bounds() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(99_999).is_ok());
        assert_eq!(
            validate_stock(-1).unwrap_err().code,
            ErrorCode::WheelchairInvalidStock
        );
        assert_eq!(
            validate_stock(100_000).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_password_length_counts_chars() {
        assert!(validate_password("abcdef").is_ok());
        assert!(validate_password("abcde").is_err());
        assert!(validate_password(&"a".repeat(50)).is_ok());
        assert!(validate_password(&"a".repeat(51)).is_err());
        // 6 个汉字 = 18 字节，但只算 6 个字符
        assert!(validate_password("密码密码密码").is_ok());
    }

    #[test]
    fn test_text_len_counts_chars() {
        let name = "轮".repeat(MAX_NAME_LEN);
        assert!(validate_text_len(&name, "轮椅名称", MAX_NAME_LEN).is_ok());
        let err = validate_text_len(&format!("{name}椅"), "轮椅名称", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.message, "轮椅名称长度不能超过100个字符");
    }
}
