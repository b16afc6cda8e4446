//! 테스트 데이터 관리 핸들러 (ADMIN 전용)
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `POST` | `/api/data/generate-users?count=1000` | 가짜 회원 생성 |
//! | `POST` | `/api/data/create-admin` | 테스트 관리자 생성 |
//! | `DELETE` | `/api/data/clear-users` | 모든 회원 삭제 |
use actix_web::{delete, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{core::errors::AppError, services::seed::SeedService};

const DEFAULT_GENERATE_COUNT: u32 = 1000;

/// 한 번에 생성할 수 있는 회원 수는 1..=10000입니다.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateQuery {
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 10000, message = "count는 1 이상 10000 이하여야 합니다"))]
    pub count: u32,
}

fn default_count() -> u32 {
    DEFAULT_GENERATE_COUNT
}

#[post("/generate-users")]
pub async fn generate_users(query: web::Query<GenerateQuery>) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let report = SeedService::instance().generate_fake_users(query.count).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[post("/create-admin")]
pub async fn create_admin() -> Result<HttpResponse, AppError> {
    let admin = SeedService::instance().create_admin().await?;
    log::info!("테스트 관리자 생성: {}", admin.email);

    Ok(HttpResponse::Ok().json(json!({ "message": "관리자 계정이 생성되었습니다." })))
}

#[delete("/clear-users")]
pub async fn clear_users() -> Result<HttpResponse, AppError> {
    let deleted_count = SeedService::instance().clear_users().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "모든 유저가 삭제되었습니다.",
        "deletedCount": deleted_count,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest, App};

    #[test]
    fn test_generate_count_bounds() {
        assert!(GenerateQuery { count: 1 }.validate().is_ok());
        assert!(GenerateQuery { count: 10_000 }.validate().is_ok());
        assert!(GenerateQuery { count: 0 }.validate().is_err());
        assert!(GenerateQuery { count: 10_001 }.validate().is_err());
        assert!(GenerateQuery { count: u32::MAX }.validate().is_err());
    }

    #[actix_web::test]
    async fn test_oversized_count_is_bad_request() {
        let app = actix_web::test::init_service(
            App::new().service(web::scope("/api/data").service(generate_users)),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/data/generate-users?count=4294967295")
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
