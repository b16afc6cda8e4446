//! bcrypt 비밀번호 해싱
//!
//! cost는 `PasswordConfig::bcrypt_cost()`를 따릅니다. 사용자 비밀번호와
//! 리프레시 토큰 원문 모두 같은 방식으로 해싱합니다.

use crate::{
    config::PasswordConfig,
    core::errors::{AppError, ErrorContext},
};

pub fn hash_password(raw: &str) -> Result<String, AppError> {
    let start = std::time::Instant::now();

    let hashed = bcrypt::hash(raw, PasswordConfig::bcrypt_cost()).context("Password hashing failed")?;

    log::debug!("Password hashing took: {:?}", start.elapsed());
    Ok(hashed)
}

/// 해시 형식이 잘못된 경우에도 `false`를 반환합니다.
pub fn verify_password(raw: &str, hashed: &str) -> bool {
    match bcrypt::verify(raw, hashed) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("Password verification error: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("123456").unwrap();
        assert_ne!(hashed, "123456");
        assert!(verify_password("123456", &hashed));
        assert!(!verify_password("654321", &hashed));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(!verify_password("123456", "not-a-bcrypt-hash"));
    }
}
