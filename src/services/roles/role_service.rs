//! 역할 관리 서비스

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{dto::roles::RoleRequest, entities::roles::Role},
    repositories::roles::{AuthorityRepository, RoleRepository},
};

static ROLE_SERVICE_INSTANCE: OnceCell<Arc<RoleService>> = OnceCell::new();

pub struct RoleService {
    role_repo: Arc<RoleRepository>,

    authority_repo: Arc<AuthorityRepository>,
}

impl RoleService {
    fn new() -> Self {
        Self {
            role_repo: RoleRepository::instance(),
            authority_repo: AuthorityRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        ROLE_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        self.role_repo.find_all().await
    }

    /// # Errors
    ///
    /// * `AppError::NotFound("Role not found with id: X")`
    pub async fn get(&self, id: &str) -> Result<Role, AppError> {
        self.role_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role not found with id: {}", id)))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.role_repo.find_by_name(name).await
    }

    pub async fn create(&self, request: RoleRequest) -> Result<Role, AppError> {
        let role = Role::new(&request.name, request.description)?;

        if self.role_repo.exists_by_name(&role.name).await? {
            return Err(duplicate_role(&role.name));
        }

        let role = self.role_repo.create(role).await?;
        log::info!("역할 생성: {}", role.name);
        Ok(role)
    }

    pub async fn update(&self, id: &str, request: RoleRequest) -> Result<Role, AppError> {
        let mut role = self.get(id).await?;
        let new_name = Role::normalize_name(&request.name)?;

        if new_name != role.name && self.role_repo.exists_by_name(&new_name).await? {
            return Err(duplicate_role(&new_name));
        }

        role.rename(&new_name)?;
        role.set_description(request.description)?;
        self.role_repo.save(&role).await?;

        Ok(role)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let role = self.get(id).await?;

        if !self.role_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Role not found with id: {}", id)));
        }

        log::warn!("역할 삭제: {}", role.name);
        Ok(())
    }

    /// 이미 보유한 권한이면 변경 없이 현재 역할을 반환합니다.
    pub async fn assign_authority(&self, role_id: &str, authority_name: &str) -> Result<Role, AppError> {
        let authority_name = authority_name.trim().to_uppercase();
        let mut role = self.get(role_id).await?;

        if self.authority_repo.find_by_name(&authority_name).await?.is_none() {
            return Err(AppError::NotFound(format!("Authority not found: {}", authority_name)));
        }

        if role.add_authority(&authority_name) {
            self.role_repo.save(&role).await?;
        }
        Ok(role)
    }

    pub async fn remove_authority(&self, role_id: &str, authority_name: &str) -> Result<Role, AppError> {
        let authority_name = authority_name.trim().to_uppercase();
        let mut role = self.get(role_id).await?;

        if !role.remove_authority(&authority_name) {
            return Err(AppError::NotFound(format!(
                "Role {} does not have authority {}",
                role.name, authority_name
            )));
        }
        self.role_repo.save(&role).await?;

        Ok(role)
    }
}

fn duplicate_role(name: &str) -> AppError {
    AppError::ConflictError(format!("Role with name '{}' already exists", name))
}

fn role_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RoleService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "role_service",
        constructor: role_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_role_message() {
        let err = duplicate_role("ADMIN");
        assert_eq!(err.message(), "Role with name 'ADMIN' already exists");
        assert_eq!(err.error_code(), "CONFLICT");
    }
}
