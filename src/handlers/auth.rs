//! Authentication HTTP Handlers
//!
//! 회원 가입, 로그인, 토큰 갱신과 로그아웃을 처리합니다.
//! 액세스 토큰은 HS256 JWT, 리프레시 토큰은 서버에 해시만 저장되는 무작위 문자열입니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `POST` | `/api/auth/register` | 일반 회원 가입 |
//! | `POST` | `/api/auth/register-with-kakao` | 카카오 알림 동의 가입 (전화번호 필수) |
//! | `POST` | `/api/auth/register-admin` | 관리자 계정 가입 |
//! | `POST` | `/api/auth/login` | 로그인 (이메일 또는 사용자명) |
//! | `POST` | `/api/auth/refresh` | 리프레시 토큰 회전 |
//! | `POST` | `/api/auth/logout` | 리프레시 토큰 폐기 |
//! | `GET` | `/api/auth/me` | 현재 사용자 (인증 필요) |
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    core::errors::AppError,
    domain::{
        dto::{
            common::now_timestamp,
            users::{LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest},
        },
        models::{auth::AuthenticatedUser, token::TokenPair},
    },
    services::{
        auth::{RefreshTokenService, TokenService},
        users::UserService,
    },
};

/// 요청의 클라이언트 IP와 User-Agent
fn client_info(req: &HttpRequest) -> (Option<String>, Option<String>) {
    let ip = req.connection_info().realip_remote_addr().map(str::to_string);
    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    (ip, user_agent)
}

/// 일반 회원 가입
///
/// # Endpoint
/// `POST /api/auth/register`
#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    log::info!("회원가입 요청 - username: {}, email: {}", payload.username, payload.email);

    let user = UserService::instance().register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User registered successfully",
        "userId": user.id_string(),
        "username": user.username,
        "timestamp": now_timestamp(),
    })))
}

/// 카카오 알림 동의 회원 가입
///
/// # Endpoint
/// `POST /api/auth/register-with-kakao`
#[post("/register-with-kakao")]
pub async fn register_with_kakao(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    if payload.phone_number.is_none() {
        return Err(AppError::ValidationError("전화번호는 필수입니다".to_string()));
    }

    let user = UserService::instance().register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User registered successfully with KakaoTalk notification",
        "userId": user.id_string(),
        "username": user.username,
        "phoneNumber": user.phone_number,
        "kakaoNotificationConsent": user.kakao_notification_consent,
        "timestamp": now_timestamp(),
    })))
}

/// 관리자 계정 가입
///
/// # Endpoint
/// `POST /api/auth/register-admin`
#[post("/register-admin")]
pub async fn register_admin(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    log::info!("관리자 생성 요청 - username: {}, email: {}", payload.username, payload.email);

    let user = UserService::instance().register_admin(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Admin registered successfully",
        "userId": user.id_string(),
        "username": user.username,
        "role": user.role,
        "timestamp": now_timestamp(),
    })))
}

/// 로그인
///
/// `email` 필드에는 이메일 또는 사용자명을 넣을 수 있습니다.
///
/// # Endpoint
/// `POST /api/auth/login`
#[post("/login")]
pub async fn login(req: HttpRequest, payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_service = UserService::instance();
    let user = user_service.authenticate(&payload.email, &payload.password).await?;
    let user_id = user
        .id_string()
        .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

    let authorities = user_service.authorities_of(&user).await?;
    let token_service = TokenService::instance();
    let token = token_service.generate_access_token(&user, &authorities)?;

    let (ip, user_agent) = client_info(&req);
    let (refresh_token, _) = RefreshTokenService::instance()
        .create(&user_id, ip.as_deref(), user_agent.as_deref())
        .await?;

    log::info!("로그인 성공 - {} ({})", user.email, user_id);

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        refresh_token,
        expires_in: token_service.expires_in(),
        id: user_id,
        username: user.username,
        email: user.email,
        role: user.role,
        authorities,
    }))
}

/// 리프레시 토큰 회전
///
/// 기존 리프레시 토큰은 폐기되고 새 토큰 쌍이 발급됩니다.
///
/// # Endpoint
/// `POST /api/auth/refresh`
#[post("/refresh")]
pub async fn refresh(req: HttpRequest, payload: web::Json<RefreshTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_service = UserService::instance();
    let user = user_service
        .find_by_id(&payload.user_id)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 리프레시 토큰입니다".to_string()))?;

    let (ip, user_agent) = client_info(&req);
    let (refresh_token, _) = RefreshTokenService::instance()
        .rotate(&payload.user_id, &payload.refresh_token, ip.as_deref(), user_agent.as_deref())
        .await?;

    let authorities = user_service.authorities_of(&user).await?;
    let token_service = TokenService::instance();
    let pair = TokenPair {
        access_token: token_service.generate_access_token(&user, &authorities)?,
        refresh_token,
        expires_in: token_service.expires_in(),
    };

    log::debug!("토큰 갱신: {}", payload.user_id);
    Ok(HttpResponse::Ok().json(pair))
}

/// 로그아웃
///
/// # Endpoint
/// `POST /api/auth/logout`
#[post("/logout")]
pub async fn logout(payload: web::Json<RefreshTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let revoked = RefreshTokenService::instance()
        .revoke_by_raw(&payload.user_id, &payload.refresh_token)
        .await?;

    if !revoked {
        log::debug!("로그아웃: 일치하는 리프레시 토큰 없음 ({})", payload.user_id);
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Logged out successfully",
        "timestamp": now_timestamp(),
    })))
}

/// 현재 인증된 사용자
///
/// 토큰 발급 후 삭제된 사용자는 404 `USER_NOT_FOUND`입니다.
///
/// # Endpoint
/// `GET /api/auth/me`
#[get("")]
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    match UserService::instance().find_by_id(&user.user_id).await? {
        Some(found) => Ok(HttpResponse::Ok().json(json!({
            "id": found.id_string(),
            "username": found.username,
            "email": found.email,
            "role": found.role,
        }))),
        None => Ok(HttpResponse::NotFound().json(json!({ "error": "USER_NOT_FOUND" }))),
    }
}
