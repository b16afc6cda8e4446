//! 문서(가이드/공지) 서비스
//!
//! 공개 API는 PUBLISHED 문서만 다루고, 관리자 API는 모든 상태를 다룹니다.
//! 목록 정렬은 `display_order` 오름차순, `created_at` 내림차순입니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{
        dto::{
            common::{PageQuery, PageResponse},
            documents::{DocumentRequest, DocumentResponse},
        },
        entities::documents::{Document, DocumentStatus},
    },
    repositories::documents::DocumentRepository,
};

pub const DEFAULT_POPULAR_LIMIT: i64 = 10;
const MAX_POPULAR_LIMIT: i64 = 100;

static DOCUMENT_SERVICE_INSTANCE: OnceCell<Arc<DocumentService>> = OnceCell::new();

pub struct DocumentService {
    document_repo: Arc<DocumentRepository>,
}

impl DocumentService {
    fn new() -> Self {
        Self {
            document_repo: DocumentRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        DOCUMENT_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 공개 문서 조회. 조회수가 1 증가합니다.
    pub async fn get_published_document(&self, slug: &str) -> Result<DocumentResponse, AppError> {
        let mut document = self
            .document_repo
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| not_found(slug))?;

        if let Some(id) = document.id_string() {
            self.document_repo.increment_view_count(&id).await?;
            document.increment_view_count();
        }

        Ok(document.into())
    }

    /// 관리자용 조회. 상태와 관계없이 조회하며 조회수는 그대로입니다.
    pub async fn get_document(&self, slug: &str) -> Result<DocumentResponse, AppError> {
        self.document_repo
            .find_by_slug(slug)
            .await?
            .map(DocumentResponse::from)
            .ok_or_else(|| not_found(slug))
    }

    pub async fn get_published_documents(&self, page: &PageQuery) -> Result<PageResponse<DocumentResponse>, AppError> {
        self.get_documents_by_status(DocumentStatus::Published, page).await
    }

    pub async fn get_documents_by_category(&self, category: &str) -> Result<Vec<DocumentResponse>, AppError> {
        Ok(into_responses(
            self.document_repo.find_published_by_category(category).await?,
        ))
    }

    pub async fn get_featured_documents(&self) -> Result<Vec<DocumentResponse>, AppError> {
        Ok(into_responses(self.document_repo.find_featured().await?))
    }

    /// limit은 1..=100으로 보정됩니다.
    pub async fn get_popular_documents(&self, limit: i64) -> Result<Vec<DocumentResponse>, AppError> {
        let limit = limit.clamp(1, MAX_POPULAR_LIMIT);
        Ok(into_responses(self.document_repo.find_popular(limit).await?))
    }

    pub async fn search_documents(
        &self,
        keyword: &str,
        page: &PageQuery,
    ) -> Result<PageResponse<DocumentResponse>, AppError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::ValidationError("검색어를 입력해주세요".to_string()));
        }

        let documents = self
            .document_repo
            .search(keyword, page.skip(), page.size() as i64)
            .await?;
        let total = self.document_repo.count_search(keyword).await?;

        Ok(PageResponse::new(documents, page, total).map(DocumentResponse::from))
    }

    pub async fn get_categories(&self) -> Result<Vec<String>, AppError> {
        self.document_repo.find_published_categories().await
    }

    pub async fn get_all_documents(&self, page: &PageQuery) -> Result<PageResponse<DocumentResponse>, AppError> {
        let documents = self
            .document_repo
            .find_all(page.skip(), page.size() as i64)
            .await?;
        let total = self.document_repo.count(mongodb::bson::doc! {}).await?;

        Ok(PageResponse::new(documents, page, total).map(DocumentResponse::from))
    }

    pub async fn get_documents_by_status(
        &self,
        status: DocumentStatus,
        page: &PageQuery,
    ) -> Result<PageResponse<DocumentResponse>, AppError> {
        let documents = self
            .document_repo
            .find_by_status(status, page.skip(), page.size() as i64)
            .await?;
        let total = self.document_repo.count_by_status(status).await?;

        Ok(PageResponse::new(documents, page, total).map(DocumentResponse::from))
    }

    /// # Errors
    ///
    /// * `AppError::ConflictError("이미 존재하는 슬러그입니다: slug")`
    pub async fn create_document(&self, request: DocumentRequest, user_email: &str) -> Result<DocumentResponse, AppError> {
        let document = Document::new(request.into(), Some(user_email.to_string()))?;

        if self.document_repo.exists_by_slug(&document.slug).await? {
            return Err(duplicate_slug(&document.slug));
        }

        let document = self.document_repo.create(document).await?;
        log::info!("문서 생성: {} ({}) by {}", document.title, document.slug, user_email);

        Ok(document.into())
    }

    pub async fn update_document(
        &self,
        id: &str,
        request: DocumentRequest,
        user_email: &str,
    ) -> Result<DocumentResponse, AppError> {
        let mut document = self
            .document_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let new_slug = request.slug.trim().to_string();
        if new_slug != document.slug && self.document_repo.exists_by_slug(&new_slug).await? {
            return Err(duplicate_slug(&new_slug));
        }

        document.apply(request.into(), Some(user_email.to_string()))?;
        self.document_repo.save(&document).await?;

        Ok(document.into())
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), AppError> {
        if !self.document_repo.delete(id).await? {
            return Err(not_found(id));
        }

        log::warn!("문서 삭제: {}", id);
        Ok(())
    }
}

fn into_responses(documents: Vec<Document>) -> Vec<DocumentResponse> {
    documents.into_iter().map(DocumentResponse::from).collect()
}

fn not_found(key: &str) -> AppError {
    AppError::NotFound(format!("문서를 찾을 수 없습니다: {}", key))
}

fn duplicate_slug(slug: &str) -> AppError {
    AppError::ConflictError(format!("이미 존재하는 슬러그입니다: {}", slug))
}

fn document_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(DocumentService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "document_service",
        constructor: document_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(not_found("abc").message(), "문서를 찾을 수 없습니다: abc");
        assert_eq!(duplicate_slug("guide").message(), "이미 존재하는 슬러그입니다: guide");
    }
}
