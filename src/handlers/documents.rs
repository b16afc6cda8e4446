//! 문서(가이드/공지) 핸들러
//!
//! 공개 API (`/api/documents/public`)는 PUBLISHED 문서만 노출합니다.
//! 관리자 API (`/api/documents/admin`)는 ADMIN 역할이 필요합니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/public?page&size` | 공개 문서 목록 |
//! | `GET` | `/public/featured` | 추천 문서 |
//! | `GET` | `/public/popular?limit=10` | 인기 문서 |
//! | `GET` | `/public/search?keyword&page&size` | 검색 |
//! | `GET` | `/public/categories` | 카테고리 목록 |
//! | `GET` | `/public/category/{category}` | 카테고리별 문서 |
//! | `GET` | `/public/{slug}` | 문서 조회 (조회수 증가) |
//! | `GET` | `/admin?page&size` | 전체 문서 |
//! | `GET` | `/admin/status/{status}` | 상태별 문서 |
//! | `GET` | `/admin/{slug}` | 문서 조회 |
//! | `POST` | `/admin` | 생성 |
//! | `PUT` | `/admin/{id}` | 수정 |
//! | `DELETE` | `/admin/{id}` | 삭제 |
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    core::errors::AppError,
    domain::{
        dto::{
            common::{now_timestamp, PageQuery},
            documents::{DocumentRequest, PopularQuery, SearchQuery},
        },
        entities::documents::DocumentStatus,
        models::auth::AuthenticatedUser,
    },
    services::documents::DocumentService,
};

#[get("")]
pub async fn list_published(page: web::Query<PageQuery>) -> Result<HttpResponse, AppError> {
    page.validate()?;
    let documents = DocumentService::instance().get_published_documents(&page).await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/featured")]
pub async fn featured() -> Result<HttpResponse, AppError> {
    let documents = DocumentService::instance().get_featured_documents().await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/popular")]
pub async fn popular(query: web::Query<PopularQuery>) -> Result<HttpResponse, AppError> {
    let documents = DocumentService::instance().get_popular_documents(query.limit).await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/search")]
pub async fn search(query: web::Query<SearchQuery>) -> Result<HttpResponse, AppError> {
    let page = PageQuery {
        page: query.page,
        size: query.size,
    };
    page.validate()?;

    let documents = DocumentService::instance()
        .search_documents(&query.keyword, &page)
        .await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/categories")]
pub async fn categories() -> Result<HttpResponse, AppError> {
    let categories = DocumentService::instance().get_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[get("/category/{category}")]
pub async fn by_category(category: web::Path<String>) -> Result<HttpResponse, AppError> {
    let documents = DocumentService::instance()
        .get_documents_by_category(&category)
        .await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/{slug}")]
pub async fn get_published(slug: web::Path<String>) -> Result<HttpResponse, AppError> {
    let document = DocumentService::instance().get_published_document(&slug).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[get("")]
pub async fn list_all(page: web::Query<PageQuery>) -> Result<HttpResponse, AppError> {
    page.validate()?;
    let documents = DocumentService::instance().get_all_documents(&page).await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/status/{status}")]
pub async fn by_status(
    status: web::Path<String>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    page.validate()?;
    let status: DocumentStatus = status.parse()?;

    let documents = DocumentService::instance()
        .get_documents_by_status(status, &page)
        .await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/{slug}")]
pub async fn get_any(slug: web::Path<String>) -> Result<HttpResponse, AppError> {
    let document = DocumentService::instance().get_document(&slug).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[post("")]
pub async fn create(
    user: AuthenticatedUser,
    payload: web::Json<DocumentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let document = DocumentService::instance()
        .create_document(payload.into_inner(), &user.email)
        .await?;
    Ok(HttpResponse::Created().json(document))
}

#[put("/{document_id}")]
pub async fn update(
    document_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<DocumentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let document = DocumentService::instance()
        .update_document(&document_id, payload.into_inner(), &user.email)
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

#[delete("/{document_id}")]
pub async fn remove(document_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    DocumentService::instance().delete_document(&document_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "문서가 삭제되었습니다.",
        "timestamp": now_timestamp(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_out_of_range_paging_is_rejected() {
        let app = test::init_service(
            App::new().service(web::scope("/api/documents/public").service(list_published)),
        )
        .await;

        for uri in [
            "/api/documents/public?page=18446744073709551615",
            "/api/documents/public?size=0",
            "/api/documents/public?size=100000",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }
}
