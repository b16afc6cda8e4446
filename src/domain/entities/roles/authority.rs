//! 권한 엔티티
//!
//! 권한 이름은 `<RESOURCE>_<ACTION>` 형식을 따릅니다. (예: `USER_READ`, `CHALLENGE_MANAGE`)

use std::fmt;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

pub const AUTHORITY_NAME_MAX_LEN: usize = 100;

/// 권한 수준. 선언 순서가 곧 강도 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionLevel {
    Unknown,
    Read,
    Write,
    Delete,
    Manage,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Unknown => "UNKNOWN",
            PermissionLevel::Read => "READ",
            PermissionLevel::Write => "WRITE",
            PermissionLevel::Delete => "DELETE",
            PermissionLevel::Manage => "MANAGE",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authority {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime,
}

impl Authority {
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이름이 비었거나 100자 초과
    pub fn new(
        name: &str,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<Self, AppError> {
        let name = name.trim().to_uppercase();

        if name.is_empty() {
            return Err(AppError::ValidationError("Authority name is required".to_string()));
        }
        if name.chars().count() > AUTHORITY_NAME_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "Authority name must not exceed {} characters",
                AUTHORITY_NAME_MAX_LEN
            )));
        }

        Ok(Self {
            id: None,
            name,
            description,
            category,
            created_at: DateTime::now(),
        })
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_read_permission(&self) -> bool {
        self.name.ends_with("_READ")
    }

    pub fn is_write_permission(&self) -> bool {
        self.name.ends_with("_WRITE")
    }

    pub fn is_delete_permission(&self) -> bool {
        self.name.ends_with("_DELETE")
    }

    pub fn is_manage_permission(&self) -> bool {
        self.name.ends_with("_MANAGE")
    }

    pub fn permission_level(&self) -> PermissionLevel {
        if self.is_manage_permission() {
            PermissionLevel::Manage
        } else if self.is_delete_permission() {
            PermissionLevel::Delete
        } else if self.is_write_permission() {
            PermissionLevel::Write
        } else if self.is_read_permission() {
            PermissionLevel::Read
        } else {
            PermissionLevel::Unknown
        }
    }

    pub fn belongs_to_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority(name: &str) -> Authority {
        Authority::new(name, None, Some("User".to_string())).unwrap()
    }

    #[test]
    fn test_permission_suffixes() {
        assert!(authority("USER_READ").is_read_permission());
        assert!(authority("USER_WRITE").is_write_permission());
        assert!(authority("USER_DELETE").is_delete_permission());
        assert!(authority("SYSTEM_MANAGE").is_manage_permission());
        assert!(!authority("USER_READER").is_read_permission());
    }

    #[test]
    fn test_permission_level_ordering() {
        assert_eq!(authority("ROLE_MANAGE").permission_level(), PermissionLevel::Manage);
        assert_eq!(authority("USER_DELETE").permission_level(), PermissionLevel::Delete);
        assert_eq!(authority("USER_WRITE").permission_level(), PermissionLevel::Write);
        assert_eq!(authority("USER_READ").permission_level(), PermissionLevel::Read);
        assert_eq!(authority("DASHBOARD").permission_level(), PermissionLevel::Unknown);

        assert!(PermissionLevel::Manage > PermissionLevel::Delete);
        assert!(PermissionLevel::Delete > PermissionLevel::Write);
        assert!(PermissionLevel::Write > PermissionLevel::Read);
        assert!(PermissionLevel::Read > PermissionLevel::Unknown);
        assert_eq!(PermissionLevel::Manage.to_string(), "MANAGE");
    }

    #[test]
    fn test_belongs_to_category_is_case_insensitive() {
        let a = authority("USER_READ");
        assert!(a.belongs_to_category("user"));
        assert!(a.belongs_to_category("USER"));
        assert!(!a.belongs_to_category("system"));

        let uncategorized = Authority::new("X_READ", None, None).unwrap();
        assert!(!uncategorized.belongs_to_category("user"));
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(Authority::new(" user_read ", None, None).unwrap().name, "USER_READ");
        assert!(Authority::new("", None, None).is_err());
        assert!(Authority::new(&"A".repeat(101), None, None).is_err());
    }
}
