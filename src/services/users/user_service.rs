//! # 사용자 관리 서비스
//!
//! 회원 가입, 인증, 조회, 수정, 삭제와 사용자 직접 권한 부여를 담당합니다.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       UserService                         │
//! ├───────────────────────────────────────────────────────────┤
//! │ register / register_admin   → 중복 검사 → bcrypt → 저장     │
//! │                              → MemberJoinEvent 발행          │
//! │ authenticate                → 사용자명 → 이메일 순서 조회    │
//! │ authorities_of              → 역할 권한 ∪ 유효한 직접 권한    │
//! │ update / delete / grant     → 관리자/본인 작업                │
//! └───────────────────────────────────────────────────────────┘
//!                  │                         │
//!                  ▼                         ▼
//!           UserRepository            RoleRepository
//! ```
//!
//! ## 오류 메시지
//!
//! | 상황 | 오류 |
//! |------|------|
//! | 사용자명 중복 | `Conflict("Username already exists")` |
//! | 이메일 중복 | `Conflict("Email already exists")` |
//! | USER 역할 없음 | `Internal("Default role USER not found")` |
//! | 로그인 실패 | `Authentication("Invalid credentials")` |
//! | 탈퇴 비밀번호 불일치 | `Authentication("Invalid password")` |

use std::any::Any;
use std::sync::Arc;

use mongodb::bson::DateTime;
use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{
        dto::{
            common::{PageQuery, PageResponse},
            users::{request::{RegisterRequest, UpdateUserRequest}, response::UserResponse},
        },
        entities::{
            roles::Role,
            users::{User, ROLE_ADMIN, ROLE_USER},
        },
        models::events::MemberJoinEvent,
    },
    repositories::{
        challenges::ChallengeRepository,
        roles::{AuthorityRepository, RoleRepository},
        tokens::RefreshTokenRepository,
        users::UserRepository,
    },
    services::{
        auth::password::{hash_password, verify_password},
        notifications::MemberJoinListenerService,
    },
};

static USER_SERVICE_INSTANCE: OnceCell<Arc<UserService>> = OnceCell::new();

pub struct UserService {
    user_repo: Arc<UserRepository>,

    role_repo: Arc<RoleRepository>,

    authority_repo: Arc<AuthorityRepository>,

    challenge_repo: Arc<ChallengeRepository>,

    refresh_token_repo: Arc<RefreshTokenRepository>,
}

impl UserService {
    fn new() -> Self {
        Self {
            user_repo: UserRepository::instance(),
            role_repo: RoleRepository::instance(),
            authority_repo: AuthorityRepository::instance(),
            challenge_repo: ChallengeRepository::instance(),
            refresh_token_repo: RefreshTokenRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        USER_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 일반 회원 가입 (USER 역할)
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        self.register_with_role(request, ROLE_USER).await
    }

    /// 관리자 계정 가입 (ADMIN 역할)
    pub async fn register_admin(&self, request: RegisterRequest) -> Result<User, AppError> {
        self.register_with_role(request, ROLE_ADMIN).await
    }

    /// 지정한 역할로 회원을 생성하고 가입 이벤트를 발행합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 사용자명 또는 이메일 중복
    /// * `AppError::InternalError` - 역할이 존재하지 않음
    pub async fn register_with_role(&self, request: RegisterRequest, role_name: &str) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();

        if self.user_repo.exists_by_username(&username).await? {
            return Err(AppError::ConflictError("Username already exists".to_string()));
        }
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::ConflictError("Email already exists".to_string()));
        }

        let role = self.role_repo.find_by_name(role_name).await?.ok_or_else(|| {
            AppError::InternalError(format!("Default role {} not found", role_name))
        })?;

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(username, email, password_hash, &role.name);
        user.phone_number = request.phone_number;
        user.kakao_notification_consent = request.kakao_notification_consent;

        let user = self.user_repo.create(user).await?;

        log::info!(
            "회원 가입 완료: {} ({}) role={} in {:?}",
            user.username,
            user.email,
            user.role,
            start_time.elapsed()
        );

        if let Some(user_id) = user.id_string() {
            MemberJoinListenerService::instance().publish(MemberJoinEvent::new(
                user_id,
                user.username.clone(),
                user.email.clone(),
            ));
        }

        Ok(user)
    }

    /// 사용자명으로 먼저 찾고, 없으면 이메일로 찾습니다.
    pub async fn find_by_login_id(&self, login_id: &str) -> Result<Option<User>, AppError> {
        let login_id = login_id.trim();
        if let Some(user) = self.user_repo.find_by_username(login_id).await? {
            return Ok(Some(user));
        }
        self.user_repo.find_by_email(login_id).await
    }

    /// # Errors
    ///
    /// * `AppError::AuthenticationError("Invalid credentials")` - 사용자가 없거나 비밀번호 불일치
    pub async fn authenticate(&self, login_id: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .find_by_login_id(login_id)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("Invalid credentials".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            log::warn!("로그인 실패: {}", login_id);
            return Err(AppError::AuthenticationError("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    /// 역할에 부여된 권한과 만료되지 않은 직접 권한의 합집합
    pub async fn authorities_of(&self, user: &User) -> Result<Vec<String>, AppError> {
        let role = self.role_repo.find_by_name(&user.role).await?;
        Ok(merge_authorities(role.as_ref(), user))
    }

    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(id).await
    }

    pub async fn get_all_users(&self, page: &PageQuery) -> Result<PageResponse<UserResponse>, AppError> {
        let users = self
            .user_repo
            .find_all(page.skip(), page.size() as i64)
            .await?;
        let total = self.user_repo.count_all().await?;

        Ok(PageResponse::new(users, page, total).map(UserResponse::from))
    }

    pub async fn get_users_by_role(
        &self,
        role: &str,
        page: &PageQuery,
    ) -> Result<PageResponse<UserResponse>, AppError> {
        let role = Role::normalize_name(role)?;
        let users = self
            .user_repo
            .find_by_role(&role, page.skip(), page.size() as i64)
            .await?;
        let total = self.user_repo.count_by_role(&role).await?;

        Ok(PageResponse::new(users, page, total).map(UserResponse::from))
    }

    pub async fn count_users_by_role(&self, role: &str) -> Result<u64, AppError> {
        let role = Role::normalize_name(role)?;
        self.user_repo.count_by_role(&role).await
    }

    pub async fn count_users(&self) -> Result<u64, AppError> {
        self.user_repo.count_all().await
    }

    /// 다른 사용자와의 사용자명/이메일 중복을 다시 확인합니다.
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<User, AppError> {
        let mut user = self.get_user(id).await?;
        let previous_email = user.email.clone();

        if let Some(username) = request.username.as_deref().map(str::trim) {
            if username != user.username {
                if let Some(other) = self.user_repo.find_by_username(username).await? {
                    if other.id != user.id {
                        return Err(AppError::ConflictError("Username already exists".to_string()));
                    }
                }
            }
        }
        if let Some(email) = request.email.as_deref().map(str::trim) {
            if email != user.email {
                if let Some(other) = self.user_repo.find_by_email(email).await? {
                    if other.id != user.id {
                        return Err(AppError::ConflictError("Email already exists".to_string()));
                    }
                }
            }
        }

        user.update_profile(request.username.as_deref(), request.email.as_deref());
        self.user_repo.save(&user, Some(&previous_email)).await?;

        Ok(user)
    }

    pub async fn update_notification_setting(&self, id: &str, enabled: bool) -> Result<User, AppError> {
        let mut user = self.get_user(id).await?;

        if enabled {
            user.enable_kakao_notifications();
        } else {
            user.disable_kakao_notifications();
        }
        self.user_repo.save(&user, None).await?;

        Ok(user)
    }

    /// # Errors
    ///
    /// * `AppError::NotFound("User not found")` - 사용자가 없음
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let user = self.get_user(id).await?;
        self.remove_user(&user, id).await
    }

    /// 본인 탈퇴. 비밀번호가 일치해야 합니다.
    pub async fn delete_current_user(&self, id: &str, password: &str) -> Result<(), AppError> {
        let user = self.get_user(id).await?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::AuthenticationError("Invalid password".to_string()));
        }

        self.remove_user(&user, id).await
    }

    async fn remove_user(&self, user: &User, id: &str) -> Result<(), AppError> {
        if !self.user_repo.delete(user).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let revoked = self.refresh_token_repo.revoke_all_for_user(id).await?;
        let detached = self.challenge_repo.remove_participant_everywhere(id).await?;

        log::warn!(
            "사용자 삭제: {} ({}) - 토큰 {}개 폐기, 챌린지 {}개에서 제외",
            user.username,
            user.email,
            revoked,
            detached
        );
        Ok(())
    }

    /// 존재하는 권한만 부여할 수 있습니다. 같은 권한을 다시 부여하면 만료 시각이 갱신됩니다.
    pub async fn grant_authority(
        &self,
        user_id: &str,
        authority_name: &str,
        granted_by: &str,
        expires_at: Option<DateTime>,
    ) -> Result<User, AppError> {
        let authority_name = authority_name.trim().to_uppercase();
        if self.authority_repo.find_by_name(&authority_name).await?.is_none() {
            return Err(AppError::NotFound(format!("Authority not found: {}", authority_name)));
        }

        let mut user = self.get_user(user_id).await?;
        user.grant_authority(&authority_name, Some(granted_by.to_string()), expires_at);
        self.user_repo.save(&user, None).await?;

        log::info!("권한 부여: {} → {} (by {})", authority_name, user.username, granted_by);
        Ok(user)
    }

    pub async fn revoke_authority(&self, user_id: &str, authority_name: &str) -> Result<User, AppError> {
        let authority_name = authority_name.trim().to_uppercase();
        let mut user = self.get_user(user_id).await?;

        if !user.revoke_authority(&authority_name) {
            return Err(AppError::NotFound(format!(
                "Authority {} is not granted to user",
                authority_name
            )));
        }
        self.user_repo.save(&user, None).await?;

        Ok(user)
    }
}

/// 정렬 + 중복 제거된 권한 목록
pub fn merge_authorities(role: Option<&Role>, user: &User) -> Vec<String> {
    let mut authorities: Vec<String> = role
        .map(|role| role.authorities.clone())
        .unwrap_or_default();
    authorities.extend(user.active_authorities(DateTime::now()));
    authorities.sort();
    authorities.dedup();
    authorities
}

fn user_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(UserService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "user_service",
        constructor: user_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_authorities_dedups_and_skips_expired() {
        let mut role = Role::new("admin", None).unwrap();
        role.add_authority("USER_READ");
        role.add_authority("USER_WRITE");

        let mut user = User::new("kim".to_string(), "kim@example.com".to_string(), "h".to_string(), "ADMIN");
        user.grant_authority("USER_READ", None, None);
        user.grant_authority("DOCUMENT_MANAGE", None, None);
        user.grant_authority("EXPIRED_READ", None, Some(DateTime::from_millis(0)));

        let merged = merge_authorities(Some(&role), &user);
        assert_eq!(merged, vec!["DOCUMENT_MANAGE", "USER_READ", "USER_WRITE"]);
    }

    #[test]
    fn test_merge_authorities_without_role() {
        let mut user = User::new("kim".to_string(), "kim@example.com".to_string(), "h".to_string(), "USER");
        user.grant_authority("PLAYER_READ", None, None);

        assert_eq!(merge_authorities(None, &user), vec!["PLAYER_READ"]);
    }
}
