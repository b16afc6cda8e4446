//! 역할/권한 관리 핸들러 (ADMIN 전용)
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/api/admin/roles` | 역할 목록 | 200 |
//! | `GET` | `/api/admin/roles/{id}` | 역할 조회 | 200 |
//! | `POST` | `/api/admin/roles` | 역할 생성 | 201 |
//! | `PUT` | `/api/admin/roles/{id}` | 역할 수정 | 200 |
//! | `DELETE` | `/api/admin/roles/{id}` | 역할 삭제 | 204 |
//! | `POST` | `/api/admin/roles/{id}/authorities/{name}` | 역할에 권한 추가 | 200 |
//! | `DELETE` | `/api/admin/roles/{id}/authorities/{name}` | 역할에서 권한 제거 | 200 |
//! | `GET` | `/api/admin/authorities?category=` | 권한 목록 | 200 |
//! | `POST` | `/api/admin/authorities` | 권한 생성 | 201 |
//! | `DELETE` | `/api/admin/authorities/{id}` | 권한 삭제 | 204 |
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    core::errors::AppError,
    domain::dto::roles::{AuthorityQuery, AuthorityResponse, CreateAuthorityRequest, RoleRequest, RoleResponse},
    services::roles::{AuthorityService, RoleService},
};

#[get("")]
pub async fn list_roles() -> Result<HttpResponse, AppError> {
    let roles: Vec<RoleResponse> = RoleService::instance()
        .list()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(roles))
}

#[get("/{role_id}")]
pub async fn get_role(role_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let role = RoleService::instance().get(&role_id).await?;
    Ok(HttpResponse::Ok().json(RoleResponse::from(role)))
}

#[post("")]
pub async fn create_role(payload: web::Json<RoleRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let role = RoleService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(RoleResponse::from(role)))
}

#[put("/{role_id}")]
pub async fn update_role(
    role_id: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let role = RoleService::instance()
        .update(&role_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(RoleResponse::from(role)))
}

#[delete("/{role_id}")]
pub async fn delete_role(role_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    RoleService::instance().delete(&role_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/{role_id}/authorities/{authority}")]
pub async fn assign_authority(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (role_id, authority) = path.into_inner();
    let role = RoleService::instance()
        .assign_authority(&role_id, &authority)
        .await?;
    Ok(HttpResponse::Ok().json(RoleResponse::from(role)))
}

#[delete("/{role_id}/authorities/{authority}")]
pub async fn remove_authority(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (role_id, authority) = path.into_inner();
    let role = RoleService::instance()
        .remove_authority(&role_id, &authority)
        .await?;
    Ok(HttpResponse::Ok().json(RoleResponse::from(role)))
}

#[get("")]
pub async fn list_authorities(query: web::Query<AuthorityQuery>) -> Result<HttpResponse, AppError> {
    let authorities: Vec<AuthorityResponse> = AuthorityService::instance()
        .list(query.category.as_deref())
        .await?
        .into_iter()
        .map(AuthorityResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(authorities))
}

#[post("")]
pub async fn create_authority(payload: web::Json<CreateAuthorityRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let authority = AuthorityService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(AuthorityResponse::from(authority)))
}

#[delete("/{authority_id}")]
pub async fn delete_authority(authority_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    AuthorityService::instance().delete(&authority_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
