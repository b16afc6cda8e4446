use serde::Deserialize;
use validator::Validate;

/// 역할 생성/수정 요청
#[derive(Debug, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 50, message = "Role name must be less than 50 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Description must be less than 255 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAuthorityRequest {
    #[validate(length(min = 1, max = 100, message = "Authority name must be less than 100 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(max = 50, message = "Category must be less than 50 characters"))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorityQuery {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_request_validation() {
        let ok = RoleRequest { name: "MODERATOR".to_string(), description: None };
        assert!(ok.validate().is_ok());

        let empty = RoleRequest { name: String::new(), description: None };
        assert!(empty.validate().is_err());

        let long = RoleRequest { name: "A".repeat(51), description: None };
        assert!(long.validate().is_err());
    }
}
