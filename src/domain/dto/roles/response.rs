use serde::Serialize;

use crate::domain::dto::common::format_datetime;
use crate::domain::entities::roles::{Authority, Role};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub authorities: Vec<String>,
    pub created_at: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id_string().unwrap_or_default(),
            name: role.name,
            description: role.description,
            authorities: role.authorities,
            created_at: format_datetime(&role.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub permission_level: String,
}

impl From<Authority> for AuthorityResponse {
    fn from(authority: Authority) -> Self {
        let permission_level = authority.permission_level().to_string();
        Self {
            id: authority.id_string().unwrap_or_default(),
            name: authority.name,
            description: authority.description,
            category: authority.category,
            permission_level,
        }
    }
}
