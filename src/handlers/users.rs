//! # User Management HTTP Handlers
//!
//! 관리자용 사용자 관리와 본인 계정 관리 엔드포인트입니다.
//!
//! ## 관리자 (`/api/users`, ADMIN 전용)
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/api/users?page&size&role` | 사용자 목록 (페이징) | 200 OK |
//! | `GET` | `/api/users/count?role=` | 사용자 수 | 200 OK |
//! | `GET` | `/api/users/{id}` | 사용자 조회 | 200 OK |
//! | `PUT` | `/api/users/{id}` | 사용자명/이메일 수정 | 200 OK |
//! | `DELETE` | `/api/users/{id}` | 사용자 삭제 | 200 OK |
//! | `POST` | `/api/users/{id}/authorities` | 직접 권한 부여 | 200 OK |
//! | `DELETE` | `/api/users/{id}/authorities/{name}` | 직접 권한 회수 | 200 OK |
//!
//! ## 본인 (`/api/me`, 인증 필요)
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/api/me` | 내 정보 |
//! | `PATCH` | `/api/me/notifications` | 카카오 알림 수신 설정 |
//! | `DELETE` | `/api/me` | 회원 탈퇴 (비밀번호 확인) |
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    core::errors::AppError,
    domain::{
        dto::{
            common::{now_timestamp, PageQuery},
            users::{
                DeleteAccountRequest, GrantAuthorityRequest, NotificationSettingRequest, RoleQuery,
                UpdateUserRequest, UserListQuery, UserResponse,
            },
        },
        models::auth::AuthenticatedUser,
    },
    services::users::UserService,
};

/// 사용자 목록
///
/// `role`이 주어지면 해당 역할의 사용자만 조회합니다.
#[get("")]
pub async fn list_users(query: web::Query<UserListQuery>) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageQuery {
        page: query.page,
        size: query.size,
    };
    page.validate()?;

    let service = UserService::instance();
    let users = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => service.get_users_by_role(role, &page).await?,
        None => service.get_all_users(&page).await?,
    };

    Ok(HttpResponse::Ok().json(users))
}

#[get("/count")]
pub async fn count_users(query: web::Query<RoleQuery>) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();

    let count = match query.role.as_deref() {
        Some(role) => service.count_users_by_role(role).await?,
        None => service.count_users().await?,
    };

    Ok(HttpResponse::Ok().json(json!({
        "role": query.role,
        "count": count,
    })))
}

#[get("/{user_id}")]
pub async fn get_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/{user_id}")]
pub async fn update_user(
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .update_user(&user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[delete("/{user_id}")]
pub async fn delete_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    UserService::instance().delete_user(&user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User deleted successfully",
        "timestamp": now_timestamp(),
    })))
}

/// 직접 권한 부여. `expiresAt`이 없으면 만료되지 않습니다.
#[post("/{user_id}/authorities")]
pub async fn grant_authority(
    user_id: web::Path<String>,
    payload: web::Json<GrantAuthorityRequest>,
    admin: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .grant_authority(
            &user_id,
            &payload.authority,
            &admin.email,
            payload.expires_at_bson(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[delete("/{user_id}/authorities/{authority}")]
pub async fn revoke_authority(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (user_id, authority) = path.into_inner();
    let user = UserService::instance()
        .revoke_authority(&user_id, &authority)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// 내 정보
#[get("")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let found = UserService::instance().get_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

#[patch("/notifications")]
pub async fn update_my_notifications(
    user: AuthenticatedUser,
    payload: web::Json<NotificationSettingRequest>,
) -> Result<HttpResponse, AppError> {
    let updated = UserService::instance()
        .update_notification_setting(&user.user_id, payload.enabled)
        .await?;

    let message = if payload.enabled {
        "카카오 알림 수신이 설정되었습니다."
    } else {
        "카카오 알림 수신이 해제되었습니다."
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "kakaoNotificationConsent": updated.kakao_notification_consent,
        "timestamp": now_timestamp(),
    })))
}

/// 회원 탈퇴
#[delete("")]
pub async fn delete_me(
    user: AuthenticatedUser,
    payload: web::Json<DeleteAccountRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    UserService::instance()
        .delete_current_user(&user.user_id, &payload.password)
        .await?;

    log::info!("회원 탈퇴: {}", user.email);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Account deleted successfully",
        "timestamp": now_timestamp(),
    })))
}
