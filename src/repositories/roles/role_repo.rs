//! 역할 리포지토리

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{is_duplicate_key_error, parse_object_id, Database},
    domain::entities::roles::Role,
};

const COLLECTION: &str = "roles";

static ROLE_REPOSITORY_INSTANCE: OnceCell<Arc<RoleRepository>> = OnceCell::new();

pub struct RoleRepository {
    db: Arc<Database>,
}

impl RoleRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        ROLE_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<Role> {
        self.db.collection::<Role>(COLLECTION)
    }

    pub async fn find_all(&self) -> Result<Vec<Role>, AppError> {
        self.collection()
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Role>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 이름은 저장 형식(대문자)으로 비교합니다.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.collection()
            .find_one(doc! { "name": name.trim().to_uppercase() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    pub async fn create(&self, mut role: Role) -> Result<Role, AppError> {
        let result = self.collection().insert_one(&role).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(format!("Role with name '{}' already exists", role.name))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        role.id = result.inserted_id.as_object_id();
        Ok(role)
    }

    pub async fn save(&self, role: &Role) -> Result<(), AppError> {
        let object_id = role
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 역할입니다".to_string()))?;

        self.collection()
            .replace_one(doc! { "_id": object_id }, role)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError(format!("Role with name '{}' already exists", role.name))
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;

        let result = self
            .collection()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    /// 권한 삭제 시 모든 역할에서 해당 권한을 제거합니다.
    pub async fn remove_authority_from_all(&self, authority: &str) -> Result<u64, AppError> {
        let result = self
            .collection()
            .update_many(
                doc! { "authorities": authority },
                doc! { "$pull": { "authorities": authority } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([name_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for RoleRepository {
    fn name(&self) -> &str {
        "role"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn role_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RoleRepository::instance())
}

fn role_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { RoleRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "role_repository",
        constructor: role_repository_constructor,
        initializer: role_repository_initializer,
    }
}
