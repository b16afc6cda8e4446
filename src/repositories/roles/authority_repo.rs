//! 권한 리포지토리

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{
    bson::{doc, Document, Regex},
    options::IndexOptions,
    Collection, IndexModel,
};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{is_duplicate_key_error, parse_object_id, Database},
    domain::entities::roles::Authority,
};

const COLLECTION: &str = "authorities";

static AUTHORITY_REPOSITORY_INSTANCE: OnceCell<Arc<AuthorityRepository>> = OnceCell::new();

pub struct AuthorityRepository {
    db: Arc<Database>,
}

impl AuthorityRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        AUTHORITY_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<Authority> {
        self.db.collection::<Authority>(COLLECTION)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Authority>, AppError> {
        self.collection()
            .find(filter)
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<Authority>, AppError> {
        self.find_many(doc! {}).await
    }

    /// 카테고리는 대소문자를 구분하지 않습니다.
    pub async fn find_by_category(&self, category: &str) -> Result<Vec<Authority>, AppError> {
        let pattern = Regex {
            pattern: format!("^{}$", regex::escape(category.trim())),
            options: "i".to_string(),
        };
        self.find_many(doc! { "category": pattern }).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Authority>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Authority>, AppError> {
        self.collection()
            .find_one(doc! { "name": name.trim().to_uppercase() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut authority: Authority) -> Result<Authority, AppError> {
        let result = self.collection().insert_one(&authority).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(format!(
                    "Authority with name '{}' already exists",
                    authority.name
                ))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        authority.id = result.inserted_id.as_object_id();
        Ok(authority)
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

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(IndexOptions::builder()
                .name("category".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([name_index, category_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for AuthorityRepository {
    fn name(&self) -> &str {
        "authority"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn authority_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(AuthorityRepository::instance())
}

fn authority_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { AuthorityRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "authority_repository",
        constructor: authority_repository_constructor,
        initializer: authority_repository_initializer,
    }
}
