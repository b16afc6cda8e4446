//! 역할 엔티티
//!
//! 역할 이름은 저장 시 공백 제거 후 대문자로 정규화됩니다.
//! 역할에 묶인 권한은 권한 이름 목록으로 보관합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::users::{ROLE_ADMIN, ROLE_DEVELOPER, ROLE_USER};

pub const ROLE_NAME_MAX_LEN: usize = 50;
pub const ROLE_DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Role {
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이름이 비었거나 길이 제한 초과
    pub fn new(name: &str, description: Option<String>) -> Result<Self, AppError> {
        let now = DateTime::now();
        let mut role = Self {
            id: None,
            name: Self::normalize_name(name)?,
            description: None,
            authorities: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        role.set_description(description)?;
        Ok(role)
    }

    /// 공백 제거 후 대문자로 변환하고 길이를 검증합니다.
    pub fn normalize_name(name: &str) -> Result<String, AppError> {
        let normalized = name.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(AppError::ValidationError("Role name is required".to_string()));
        }
        if normalized.chars().count() > ROLE_NAME_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "Role name must not exceed {} characters",
                ROLE_NAME_MAX_LEN
            )));
        }

        Ok(normalized)
    }

    pub fn set_description(&mut self, description: Option<String>) -> Result<(), AppError> {
        if let Some(ref d) = description {
            if d.chars().count() > ROLE_DESCRIPTION_MAX_LEN {
                return Err(AppError::ValidationError(format!(
                    "Description must not exceed {} characters",
                    ROLE_DESCRIPTION_MAX_LEN
                )));
            }
        }
        self.description = description;
        self.updated_at = DateTime::now();
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<(), AppError> {
        self.name = Self::normalize_name(name)?;
        self.updated_at = DateTime::now();
        Ok(())
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_admin(&self) -> bool {
        self.name == ROLE_ADMIN
    }

    pub fn is_user(&self) -> bool {
        self.name == ROLE_USER
    }

    pub fn is_developer(&self) -> bool {
        self.name == ROLE_DEVELOPER
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// 새로 추가되면 `true`
    pub fn add_authority(&mut self, authority: &str) -> bool {
        if self.has_authority(authority) {
            return false;
        }
        self.authorities.push(authority.to_string());
        self.updated_at = DateTime::now();
        true
    }

    /// 제거되면 `true`
    pub fn remove_authority(&mut self, authority: &str) -> bool {
        let before = self.authorities.len();
        self.authorities.retain(|a| a != authority);
        let removed = before != self.authorities.len();
        if removed {
            self.updated_at = DateTime::now();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed_and_uppercased() {
        let role = Role::new("  developer ", Some("개발자".to_string())).unwrap();
        assert_eq!(role.name, "DEVELOPER");
        assert!(role.is_developer());
        assert!(!role.is_admin());
        assert!(!role.is_user());
    }

    #[test]
    fn test_name_validation() {
        assert!(Role::new("   ", None).is_err());
        assert!(Role::new(&"A".repeat(51), None).is_err());
        assert!(Role::new(&"A".repeat(50), None).is_ok());
    }

    #[test]
    fn test_description_length() {
        assert!(Role::new("USER", Some("가".repeat(255))).is_ok());
        assert!(Role::new("USER", Some("가".repeat(256))).is_err());
    }

    #[test]
    fn test_authority_assignment() {
        let mut role = Role::new("ADMIN", None).unwrap();
        assert!(role.add_authority("USER_READ"));
        assert!(!role.add_authority("USER_READ"));
        assert!(role.has_authority("USER_READ"));

        assert!(role.remove_authority("USER_READ"));
        assert!(!role.remove_authority("USER_READ"));
        assert!(role.authorities.is_empty());
    }
}
