//! 密码哈希 (Argon2id)

use std::sync::LazyLock;

/// 未知用户登录时用于校验的占位哈希
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("rental-dummy-password").ok());

/// 哈希密码 (随机盐, PHC 字符串格式)
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// 校验密码; 哈希格式损坏视为不匹配
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// 对占位哈希做一次完整校验，恒返回 `false`
///
/// 账号不存在时调用，使其耗时与密码错误一致。
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_dummy_verification_runs_and_never_matches() {
        assert!(DUMMY_HASH.as_deref().is_some_and(|h| h.starts_with("$argon2")));
        assert!(!verify_dummy_password("rental-dummy-password"));
        assert!(!verify_dummy_password(""));
    }
}
