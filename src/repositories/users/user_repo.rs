//! 사용자 리포지토리
//!
//! 단건 조회(id, email)는 Redis cache-aside를 사용합니다. 캐시 TTL은 600초이며
//! 저장/삭제 시 해당 사용자의 키를 무효화합니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};
use once_cell::sync::OnceCell;

use crate::{
    caching::redis::RedisClient,
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{is_duplicate_key_error, parse_object_id, Database},
    domain::entities::users::User,
};

const COLLECTION: &str = "users";
const CACHE_TTL_SECONDS: u64 = 600;

static USER_REPOSITORY_INSTANCE: OnceCell<Arc<UserRepository>> = OnceCell::new();

pub struct UserRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
            redis: ServiceLocator::get::<RedisClient>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        USER_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<User> {
        self.db.collection::<User>(COLLECTION)
    }

    fn cache_key(&self, id: &str) -> String {
        format!("user:{}", id)
    }

    fn email_cache_key(&self, email: &str) -> String {
        format!("user:email:{}", email)
    }

    async fn cache_user(&self, user: &User) {
        if let Some(id) = user.id_string() {
            let _ = self.redis.set_with_expiry(&self.cache_key(&id), user, CACHE_TTL_SECONDS).await;
        }
        let _ = self
            .redis
            .set_with_expiry(&self.email_cache_key(&user.email), user, CACHE_TTL_SECONDS)
            .await;
    }

    async fn invalidate_cache(&self, user: &User) {
        let mut keys = vec![self.email_cache_key(&user.email)];
        if let Some(id) = user.id_string() {
            keys.push(self.cache_key(&id));
        }
        let _ = self.redis.del_multiple(&keys).await;
    }

    async fn find_many(&self, filter: Document, sort: Document, skip: u64, limit: i64) -> Result<Vec<User>, AppError> {
        self.collection()
            .find(filter)
            .sort(sort)
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let cache_key = self.email_cache_key(email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            self.cache_user(user).await;
        }

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.collection()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = parse_object_id(id)?;
        let cache_key = self.cache_key(&object_id.to_hex());

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            self.cache_user(user).await;
        }

        Ok(user)
    }

    /// 유효하지 않은 ID는 건너뜁니다.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError> {
        let object_ids: Vec<ObjectId> = ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();

        if object_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.find_many(doc! { "_id": { "$in": object_ids } }, doc! { "username": 1 }, 0, 0)
            .await
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    pub async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<User>, AppError> {
        self.find_many(doc! {}, doc! { "created_at": -1 }, skip, limit).await
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.collection()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_role(&self, role: &str, skip: u64, limit: i64) -> Result<Vec<User>, AppError> {
        self.find_many(doc! { "role": role }, doc! { "created_at": -1 }, skip, limit)
            .await
    }

    pub async fn count_by_role(&self, role: &str) -> Result<u64, AppError> {
        self.collection()
            .count_documents(doc! { "role": role })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 카카오 알림 수신 대상 (동의 + 전화번호 보유)
    pub async fn find_kakao_recipients(&self) -> Result<Vec<User>, AppError> {
        self.find_many(
            doc! {
                "kakao_notification_consent": true,
                "phone_number": { "$exists": true, "$ne": null },
            },
            doc! { "created_at": 1 },
            0,
            0,
        )
        .await
    }

    /// 알림 수신에 동의한 사용자
    pub async fn find_consenting_users(&self) -> Result<Vec<User>, AppError> {
        self.find_many(
            doc! { "kakao_notification_consent": true },
            doc! { "created_at": 1 },
            0,
            0,
        )
        .await
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        let result = self.collection().insert_one(&user).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError("이미 사용 중인 사용자명 또는 이메일입니다".to_string())
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// 순서 없이 일괄 삽입합니다. 중복 키로 실패한 문서는 건너뜁니다.
    pub async fn create_many(&self, users: Vec<User>) -> Result<(), AppError> {
        if users.is_empty() {
            return Ok(());
        }

        match self.collection().insert_many(users).ordered(false).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_error(&e) => {
                log::warn!("⚠️ 일부 사용자가 중복으로 건너뛰어졌습니다: {}", e);
                Ok(())
            }
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    /// 전체 문서를 교체합니다. 이전 이메일 캐시도 함께 무효화합니다.
    pub async fn save(&self, user: &User, previous_email: Option<&str>) -> Result<(), AppError> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        self.collection()
            .replace_one(doc! { "_id": object_id }, user)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("이미 사용 중인 사용자명 또는 이메일입니다".to_string())
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        if let Some(email) = previous_email {
            let _ = self.redis.del(&self.email_cache_key(email)).await;
        }
        self.invalidate_cache(user).await;

        Ok(())
    }

    pub async fn delete(&self, user: &User) -> Result<bool, AppError> {
        let Some(object_id) = user.id else {
            return Ok(false);
        };

        let result = self
            .collection()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(user).await;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let result = self
            .collection()
            .delete_many(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let _ = self.redis.del_pattern("user:*").await;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        // 전화번호는 있을 때만 유일
        let phone_index = IndexModel::builder()
            .keys(doc! { "phone_number": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "phone_number": { "$type": "string" } })
                .name("phone_number_unique".to_string())
                .build())
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("role_created_at".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([email_index, username_index, phone_index, role_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for UserRepository {
    fn name(&self) -> &str {
        "user"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn user_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(UserRepository::instance())
}

fn user_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { UserRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "user_repository",
        constructor: user_repository_constructor,
        initializer: user_repository_initializer,
    }
}
