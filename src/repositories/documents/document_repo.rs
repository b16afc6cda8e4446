//! 문서 리포지토리
//!
//! 관리자 목록은 `display_order` 오름차순, `created_at` 내림차순으로 정렬합니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{
    bson::{doc, Bson, Document as BsonDocument, Regex},
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
    domain::entities::documents::{Document, DocumentStatus},
};

const COLLECTION: &str = "documents";

static DOCUMENT_REPOSITORY_INSTANCE: OnceCell<Arc<DocumentRepository>> = OnceCell::new();

/// 대소문자 무시 부분 일치 검색 조건. 키워드는 정규식 이스케이프됩니다.
pub fn search_filter(keyword: &str) -> BsonDocument {
    let pattern = Regex {
        pattern: regex::escape(keyword.trim()),
        options: "i".to_string(),
    };

    doc! {
        "status": DocumentStatus::Published.as_str(),
        "$or": [
            { "title": pattern.clone() },
            { "description": pattern.clone() },
            { "content": pattern },
        ],
    }
}

fn default_sort() -> BsonDocument {
    doc! { "display_order": 1, "created_at": -1 }
}

pub struct DocumentRepository {
    db: Arc<Database>,
}

impl DocumentRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        DOCUMENT_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<Document> {
        self.db.collection::<Document>(COLLECTION)
    }

    async fn find_many(
        &self,
        filter: BsonDocument,
        sort: BsonDocument,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
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

    pub async fn count(&self, filter: BsonDocument) -> Result<u64, AppError> {
        self.collection()
            .count_documents(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Document>, AppError> {
        self.collection()
            .find_one(doc! { "slug": slug })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Document>, AppError> {
        self.collection()
            .find_one(doc! { "slug": slug, "status": DocumentStatus::Published.as_str() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    pub async fn find_by_status(&self, status: DocumentStatus, skip: u64, limit: i64) -> Result<Vec<Document>, AppError> {
        self.find_many(doc! { "status": status.as_str() }, default_sort(), skip, limit)
            .await
    }

    pub async fn count_by_status(&self, status: DocumentStatus) -> Result<u64, AppError> {
        self.count(doc! { "status": status.as_str() }).await
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<Document>, AppError> {
        self.find_many(doc! {}, default_sort(), skip, limit).await
    }

    pub async fn find_published_by_category(&self, category: &str) -> Result<Vec<Document>, AppError> {
        self.find_many(
            doc! { "status": DocumentStatus::Published.as_str(), "category": category },
            default_sort(),
            0,
            0,
        )
        .await
    }

    pub async fn find_featured(&self) -> Result<Vec<Document>, AppError> {
        self.find_many(
            doc! { "status": DocumentStatus::Published.as_str(), "is_featured": true },
            default_sort(),
            0,
            0,
        )
        .await
    }

    pub async fn find_popular(&self, limit: i64) -> Result<Vec<Document>, AppError> {
        self.find_many(
            doc! { "status": DocumentStatus::Published.as_str() },
            doc! { "view_count": -1, "created_at": -1 },
            0,
            limit,
        )
        .await
    }

    pub async fn search(&self, keyword: &str, skip: u64, limit: i64) -> Result<Vec<Document>, AppError> {
        self.find_many(search_filter(keyword), default_sort(), skip, limit)
            .await
    }

    pub async fn count_search(&self, keyword: &str) -> Result<u64, AppError> {
        self.count(search_filter(keyword)).await
    }

    /// 공개 문서의 카테고리 (정렬, 중복 제거)
    pub async fn find_published_categories(&self) -> Result<Vec<String>, AppError> {
        let values = self
            .collection()
            .distinct("category", doc! { "status": DocumentStatus::Published.as_str() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut categories: Vec<String> = values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub async fn increment_view_count(&self, id: &str) -> Result<(), AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .update_one(doc! { "_id": object_id }, doc! { "$inc": { "view_count": 1_i64 } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn create(&self, mut document: Document) -> Result<Document, AppError> {
        let result = self.collection().insert_one(&document).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(format!("이미 존재하는 슬러그입니다: {}", document.slug))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        document.id = result.inserted_id.as_object_id();
        Ok(document)
    }

    pub async fn save(&self, document: &Document) -> Result<(), AppError> {
        let object_id = document
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 문서입니다".to_string()))?;

        self.collection()
            .replace_one(doc! { "_id": object_id }, document)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError(format!("이미 존재하는 슬러그입니다: {}", document.slug))
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

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("slug_unique".to_string())
                .build())
            .build();

        let listing_index = IndexModel::builder()
            .keys(doc! { "status": 1, "display_order": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("status_display_order".to_string())
                .build())
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(IndexOptions::builder()
                .name("category".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([slug_index, listing_index, category_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for DocumentRepository {
    fn name(&self) -> &str {
        "document"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn document_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(DocumentRepository::instance())
}

fn document_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { DocumentRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "document_repository",
        constructor: document_repository_constructor,
        initializer: document_repository_initializer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_escapes_keyword() {
        let filter = search_filter(" c++ (guide) ");
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);

        let title = clauses[0].as_document().unwrap();
        match title.get("title") {
            Some(Bson::RegularExpression(regex)) => {
                assert_eq!(regex.pattern, r"c\+\+ \(guide\)");
                assert_eq!(regex.options, "i");
            }
            other => panic!("unexpected title clause: {:?}", other),
        }
        assert_eq!(filter.get_str("status").unwrap(), "PUBLISHED");
    }
}
