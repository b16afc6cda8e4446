//! # 초기 데이터/테스트 데이터 서비스
//!
//! 기동 시 [`SeedService::run`]이 한 번 실행되며 모든 단계는 멱등입니다.
//!
//! | 단계 | 조건 | 내용 |
//! |------|------|------|
//! | 기본 역할 | `APP_ROLES_AUTOCREATE` | USER / ADMIN / DEVELOPER |
//! | 기본 관리자 | `APP_USERS_AUTOCREATE` | `SeedConfig`의 관리자 계정 |
//! | 필수 계정 | 항상 | terecal(ADMIN), test1, test2 |
//! | 가짜 회원 | `APP_DATA_LOAD_INITIAL_USERS` | 회원이 3명 이하일 때 1000명 |
//!
//! `/api/data` 관리자 API도 이 서비스를 사용합니다.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rand::Rng;
use serde::Serialize;

use crate::{
    config::SeedConfig,
    core::{errors::AppError, registry::ServiceRegistration},
    domain::entities::{
        roles::Role,
        users::{User, ROLE_ADMIN, ROLE_DEVELOPER, ROLE_USER},
    },
    repositories::{roles::RoleRepository, users::UserRepository},
    services::auth::password::hash_password,
};

const BASE_ROLES: [(&str, &str); 3] = [
    (ROLE_USER, "기본 사용자"),
    (ROLE_ADMIN, "관리자"),
    (ROLE_DEVELOPER, "개발자"),
];

const ESSENTIAL_PASSWORD: &str = "123456";
const ESSENTIAL_ACCOUNTS: [(&str, &str, &str); 3] = [
    ("terecal", "terecal@daum.net", ROLE_ADMIN),
    ("test1", "test1@daum.net", ROLE_USER),
    ("test2", "test2@daum.net", ROLE_USER),
];

const TEST_ADMIN_USERNAME: &str = "admin";
const TEST_ADMIN_EMAIL: &str = "admin@example.com";
const TEST_ADMIN_PASSWORD: &str = "admin123";

const FAKE_USER_PASSWORD: &str = "password123";
const INITIAL_FAKE_USERS: u32 = 1000;
pub const MAX_GENERATE_COUNT: u32 = 10_000;
const MAX_COLLISION_RETRIES: u64 = 100;
const RETRY_ID_STRIDE: u64 = 1_000_000;

const FAMILY_NAMES: [&str; 40] = [
    "김", "이", "박", "최", "정", "강", "조", "윤", "장", "임", "한", "오", "서", "신", "권", "황", "안",
    "송", "류", "전", "홍", "고", "문", "양", "손", "배", "조", "백", "허", "유", "남", "심", "노", "정",
    "하", "곽", "성", "차", "주", "우",
];

const GIVEN_NAMES: [&str; 30] = [
    "민수", "지혜", "준호", "수진", "현우", "미영", "성호", "은정", "태윤", "소영", "동현", "예린", "진우",
    "하늘", "승민", "다은", "우진", "채원", "시우", "서연", "도윤", "지윤", "건우", "유진", "준서", "서현",
    "민준", "지아", "예준", "서우",
];

const EMAIL_DOMAINS: [&str; 7] = [
    "gmail.com", "naver.com", "daum.net", "kakao.com", "yahoo.com", "outlook.com", "hotmail.com",
];

static SEED_SERVICE_INSTANCE: OnceCell<Arc<SeedService>> = OnceCell::new();

/// `POST /api/data/generate-users` 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUsersReport {
    pub message: String,
    pub requested_count: u32,
    pub actually_created: u64,
    pub total_users_before: u64,
    pub total_users_after: u64,
    pub duration: String,
}

pub struct SeedService {
    user_repo: Arc<UserRepository>,

    role_repo: Arc<RoleRepository>,
}

impl SeedService {
    fn new() -> Self {
        Self {
            user_repo: UserRepository::instance(),
            role_repo: RoleRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        SEED_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 기동 시 초기 데이터를 준비합니다.
    pub async fn run(&self) -> Result<(), AppError> {
        if SeedConfig::roles_autocreate() {
            self.seed_roles().await?;
        } else {
            log::info!("[Seed] 기본 역할 생성 건너뜀 (APP_ROLES_AUTOCREATE=false)");
        }

        if SeedConfig::users_autocreate() {
            self.seed_default_admin().await?;
        } else {
            log::info!("[Seed] 기본 관리자 생성 건너뜀 (APP_USERS_AUTOCREATE=false)");
        }

        self.seed_essential_accounts().await?;

        if SeedConfig::load_initial_users() {
            self.load_initial_users().await?;
        }

        Ok(())
    }

    pub async fn seed_roles(&self) -> Result<(), AppError> {
        for (name, description) in BASE_ROLES {
            self.ensure_role(name, description).await?;
        }
        Ok(())
    }

    async fn ensure_role(&self, name: &str, description: &str) -> Result<Role, AppError> {
        if let Some(role) = self.role_repo.find_by_name(name).await? {
            return Ok(role);
        }

        let role = self
            .role_repo
            .create(Role::new(name, Some(description.to_string()))?)
            .await?;
        log::info!("[Seed] 역할 생성: {} ({})", role.name, description);
        Ok(role)
    }

    pub async fn seed_default_admin(&self) -> Result<(), AppError> {
        let username = SeedConfig::admin_username();
        let email = SeedConfig::admin_email();

        if self.role_repo.find_by_name(ROLE_ADMIN).await?.is_none() {
            log::warn!("[Seed] ADMIN 역할이 없어 기본 관리자를 만들 수 없습니다.");
            return Ok(());
        }

        let email_exists = self.user_repo.exists_by_email(&email).await?;
        let username_exists = self.user_repo.exists_by_username(&username).await?;
        if email_exists || username_exists {
            log::info!(
                "[Seed] 기본 관리자 존재 (usernameExists={}, emailExists={}) username={} email={}",
                username_exists,
                email_exists,
                username,
                email
            );
            return Ok(());
        }

        let admin = User::new(
            username.clone(),
            email.clone(),
            hash_password(&SeedConfig::admin_password())?,
            ROLE_ADMIN,
        );
        self.user_repo.create(admin).await?;
        log::info!("[Seed] 기본 관리자 생성 username={} email={}", username, email);

        Ok(())
    }

    /// 이메일 기준으로 없는 계정만 만듭니다.
    pub async fn seed_essential_accounts(&self) -> Result<(), AppError> {
        self.ensure_role(ROLE_ADMIN, "관리자").await?;
        self.ensure_role(ROLE_USER, "기본 사용자").await?;

        let password_hash = hash_password(ESSENTIAL_PASSWORD)?;

        for (username, email, role) in ESSENTIAL_ACCOUNTS {
            if self.user_repo.exists_by_email(email).await? {
                log::debug!("[Seed] 필수 계정 존재: {}", email);
                continue;
            }

            let user = User::new(username.to_string(), email.to_string(), password_hash.clone(), role);
            match self.user_repo.create(user).await {
                Ok(_) => log::info!("[Seed] 필수 계정 생성: {}", email),
                Err(AppError::ConflictError(msg)) => log::warn!("[Seed] 필수 계정 건너뜀 {}: {}", email, msg),
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    async fn load_initial_users(&self) -> Result<(), AppError> {
        if self.user_repo.count_all().await? > ESSENTIAL_ACCOUNTS.len() as u64 {
            log::info!("[Seed] 추가 회원 데이터가 이미 존재합니다. 건너뜀");
            return Ok(());
        }

        if !self.user_repo.exists_by_email(TEST_ADMIN_EMAIL).await? {
            self.create_test_admin().await?;
        }

        let report = self.generate_fake_users(INITIAL_FAKE_USERS).await?;
        log::info!("[Seed] {}", report.message);
        Ok(())
    }

    /// 가짜 회원을 일괄 생성합니다.
    ///
    /// 사용자명은 `{성}{이름}_{uniqueId}`, 이메일은 `user_{uniqueId}@{도메인}`입니다.
    /// 기존 회원과 충돌하면 uniqueId를 바꿔 최대 100번 재시도합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - USER 역할이 없음
    /// * `AppError::ValidationError` - count가 1..=MAX_GENERATE_COUNT 범위 밖
    /// * `AppError::ConflictError` - 충돌 해결 실패
    pub async fn generate_fake_users(&self, count: u32) -> Result<GenerateUsersReport, AppError> {
        if !(1..=MAX_GENERATE_COUNT).contains(&count) {
            return Err(AppError::ValidationError(format!(
                "count는 1 이상 {} 이하여야 합니다",
                MAX_GENERATE_COUNT
            )));
        }

        let start_time = std::time::Instant::now();
        let total_users_before = self.user_repo.count_all().await?;

        let user_role = self
            .role_repo
            .find_by_name(ROLE_USER)
            .await?
            .ok_or_else(|| AppError::InternalError("USER role not found".to_string()))?;
        let password_hash = hash_password(FAKE_USER_PASSWORD)?;

        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut taken: HashSet<String> = HashSet::new();
        let mut users = Vec::new();

        for i in 1..=u64::from(count) {
            let base_id = timestamp + total_users_before + i;
            let (family, given) = random_name(&mut rand::rng());

            let mut attempt = 0;
            let (username, email) = loop {
                let unique_id = base_id + attempt * RETRY_ID_STRIDE;
                let username = fake_username(family, given, unique_id);
                let email = fake_email(unique_id, random_domain(&mut rand::rng()));

                let collides = taken.contains(&username)
                    || taken.contains(&email)
                    || self.user_repo.exists_by_email(&email).await?
                    || self.user_repo.exists_by_username(&username).await?;
                if !collides {
                    break (username, email);
                }

                attempt += 1;
                if attempt > MAX_COLLISION_RETRIES {
                    return Err(AppError::ConflictError(
                        "중복 해결에 실패했습니다. 시스템 관리자에게 문의하세요.".to_string(),
                    ));
                }
            };

            taken.insert(username.clone());
            taken.insert(email.clone());
            users.push(User::new(username, email, password_hash.clone(), &user_role.name));
        }

        self.user_repo.create_many(users).await?;

        let total_users_after = self.user_repo.count_all().await?;
        let actually_created = total_users_after.saturating_sub(total_users_before);
        let duration = format!("{}ms", start_time.elapsed().as_millis());

        log::info!(
            "가짜 회원 생성: 요청 {} / 생성 {} ({})",
            count,
            actually_created,
            duration
        );

        Ok(GenerateUsersReport {
            message: format!("{}명의 새로운 유저가 추가로 생성되었습니다.", actually_created),
            requested_count: count,
            actually_created,
            total_users_before,
            total_users_after,
            duration,
        })
    }

    /// # Errors
    ///
    /// * `AppError::ValidationError("관리자 계정이 이미 존재합니다.")`
    pub async fn create_admin(&self) -> Result<User, AppError> {
        if self.user_repo.exists_by_email(TEST_ADMIN_EMAIL).await? {
            return Err(AppError::ValidationError("관리자 계정이 이미 존재합니다.".to_string()));
        }
        self.create_test_admin().await
    }

    async fn create_test_admin(&self) -> Result<User, AppError> {
        if self.role_repo.find_by_name(ROLE_ADMIN).await?.is_none() {
            return Err(AppError::InternalError("ADMIN role not found".to_string()));
        }

        let admin = User::new(
            TEST_ADMIN_USERNAME.to_string(),
            TEST_ADMIN_EMAIL.to_string(),
            hash_password(TEST_ADMIN_PASSWORD)?,
            ROLE_ADMIN,
        );
        self.user_repo.create(admin).await
    }

    /// 모든 회원을 삭제하고 삭제 전 회원 수를 반환합니다.
    pub async fn clear_users(&self) -> Result<u64, AppError> {
        let count = self.user_repo.count_all().await?;
        let deleted = self.user_repo.delete_all().await?;

        log::warn!("모든 회원 삭제: {}명 (조회 {}명)", deleted, count);
        Ok(count)
    }
}

fn random_name<R: Rng>(rng: &mut R) -> (&'static str, &'static str) {
    (
        FAMILY_NAMES[rng.random_range(0..FAMILY_NAMES.len())],
        GIVEN_NAMES[rng.random_range(0..GIVEN_NAMES.len())],
    )
}

fn random_domain<R: Rng>(rng: &mut R) -> &'static str {
    EMAIL_DOMAINS[rng.random_range(0..EMAIL_DOMAINS.len())]
}

pub fn fake_username(family: &str, given: &str, unique_id: u64) -> String {
    format!("{}{}_{}", family, given, unique_id)
}

pub fn fake_email(unique_id: u64, domain: &str) -> String {
    format!("user_{}@{}", unique_id, domain)
}

fn seed_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(SeedService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "seed_service",
        constructor: seed_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_identity_format() {
        assert_eq!(fake_username("김", "민수", 1700000000001), "김민수_1700000000001");
        assert_eq!(fake_email(42, "daum.net"), "user_42@daum.net");
    }

    #[test]
    fn test_random_picks_come_from_pools() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let (family, given) = random_name(&mut rng);
            assert!(FAMILY_NAMES.contains(&family));
            assert!(GIVEN_NAMES.contains(&given));
            assert!(EMAIL_DOMAINS.contains(&random_domain(&mut rng)));
        }
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = GenerateUsersReport {
            message: "3명의 새로운 유저가 추가로 생성되었습니다.".to_string(),
            requested_count: 3,
            actually_created: 3,
            total_users_before: 10,
            total_users_after: 13,
            duration: "12ms".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["requestedCount"], 3);
        assert_eq!(json["actuallyCreated"], 3);
        assert_eq!(json["totalUsersBefore"], 10);
        assert_eq!(json["totalUsersAfter"], 13);
        assert_eq!(json["duration"], "12ms");
    }
}
