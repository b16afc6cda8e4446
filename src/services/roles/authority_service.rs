//! 권한 관리 서비스
//!
//! 권한을 삭제하면 해당 권한을 보유한 모든 역할에서도 제거됩니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{dto::roles::CreateAuthorityRequest, entities::roles::Authority},
    repositories::roles::{AuthorityRepository, RoleRepository},
    utils::string_utils::clean_optional_string,
};

static AUTHORITY_SERVICE_INSTANCE: OnceCell<Arc<AuthorityService>> = OnceCell::new();

pub struct AuthorityService {
    authority_repo: Arc<AuthorityRepository>,

    role_repo: Arc<RoleRepository>,
}

impl AuthorityService {
    fn new() -> Self {
        Self {
            authority_repo: AuthorityRepository::instance(),
            role_repo: RoleRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        AUTHORITY_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 카테고리가 주어지면 대소문자 구분 없이 필터링합니다.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Authority>, AppError> {
        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => self.authority_repo.find_by_category(category).await,
            None => self.authority_repo.find_all().await,
        }
    }

    pub async fn create(&self, request: CreateAuthorityRequest) -> Result<Authority, AppError> {
        let authority = Authority::new(
            &request.name,
            clean_optional_string(request.description),
            clean_optional_string(request.category),
        )?;

        if self.authority_repo.find_by_name(&authority.name).await?.is_some() {
            return Err(AppError::ConflictError(format!(
                "Authority with name '{}' already exists",
                authority.name
            )));
        }

        self.authority_repo.create(authority).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let authority = self
            .authority_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Authority not found with id: {}", id)))?;

        self.authority_repo.delete(id).await?;
        let detached = self.role_repo.remove_authority_from_all(&authority.name).await?;

        log::warn!("권한 삭제: {} ({}개 역할에서 제거)", authority.name, detached);
        Ok(())
    }
}

fn authority_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(AuthorityService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "authority_service",
        constructor: authority_service_constructor,
    }
}
