//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! 관리자 백엔드의 모든 리포지토리와 서비스는 프로세스 전역 싱글톤입니다.
//! 각 컴포넌트는 `OnceCell<Arc<T>>`에 자신의 인스턴스를 보관하고,
//! `inventory::submit!`으로 생성자를 등록합니다.
//!
//! ## 구성 요소
//!
//! - **ServiceLocator**: `TypeId` 기반 전역 컨테이너
//!   - 인프라 컴포넌트(`Database`, `RedisClient`)는 `set()`으로 직접 등록
//!   - 리포지토리/서비스는 이름 기반 레지스트리에서 지연 생성
//! - **ServiceRegistration / RepositoryRegistration**: inventory로 수집되는 생성자 목록
//!
//! ## 이름 매칭 규칙
//!
//! 타입 이름과 등록 이름은 소문자화 후 언더스코어를 제거하여 비교합니다.
//!
//! ```text
//! ChallengeRewardService  →  "challengereward"
//! "challenge_reward_service" →  "challengereward"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! // main.rs
//! ServiceLocator::set(Arc::new(database));
//! ServiceLocator::set(Arc::new(redis_client));
//! ServiceLocator::initialize_all().await?;
//!
//! // 서비스 생성자 내부
//! let user_repo = ServiceLocator::get::<UserRepository>();
//! ```

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::core::errors::AppError;
use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// 컬렉션을 소유하는 리포지토리
///
/// `init`은 기동 시 한 번 호출되며 인덱스 생성처럼 멱등한 작업만 수행해야 합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), AppError>;
}

/// inventory로 수집되는 서비스 생성자
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// inventory로 수집되는 리포지토리 생성자
///
/// `initializer`는 인덱스 생성 등 기동 시점 작업을 수행합니다.
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
    pub initializer: fn() -> futures_util::future::BoxFuture<'static, Result<(), AppError>>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (normalize_name(registration.name), registration))
        .collect();

    print_cache_initialized("Service", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
            .map(|registration| (normalize_name(registration.name), registration))
            .collect();

        print_cache_initialized("Repository", cache.len());
        cache
    });

/// 등록 이름/타입 이름을 비교용 키로 정규화합니다.
///
/// `_service`, `_repository`, `Service`, `Repository` 접미사를 제거한 뒤
/// 소문자화하고 언더스코어를 없앱니다.
pub(crate) fn normalize_name(name: &str) -> String {
    let base = name
        .strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .or_else(|| name.strip_suffix("Service"))
        .or_else(|| name.strip_suffix("Repository"))
        .unwrap_or(name);

    base.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 전역 싱글톤 컨테이너
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

enum ComponentKind {
    Repository,
    Service,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    /// 타입에 해당하는 싱글톤을 반환합니다.
    ///
    /// 등록되지 않은 타입이나 순환 참조는 기동 단계의 프로그래밍 오류이므로 패닉합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Ok(instance) => instance,
            Err(e) => {
                log::error!("❌ ServiceLocator 조회 실패: {}", e);
                panic!("{}", e);
            }
        }
    }

    /// 타입에 해당하는 싱글톤을 조회하거나 레지스트리에서 생성합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Result<Arc<T>, AppError> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::cached::<T>(type_id)? {
            return Ok(instance);
        }

        {
            let mut initializing = LOCATOR
                .initializing
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if !initializing.insert(type_id) {
                return Err(AppError::InternalError(format!(
                    "Circular dependency detected: {} is already being initialized",
                    type_name
                )));
            }
        }

        // 생성자는 다른 컴포넌트를 조회할 수 있으므로 락을 잡지 않은 상태로 호출한다
        let created = Self::construct::<T>(type_name);

        LOCATOR
            .initializing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&type_id);

        let instance = created?;
        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
            .clone();

        stored.downcast::<T>().map_err(|_| {
            AppError::InternalError(format!("Type mismatch in ServiceLocator: {}", type_name))
        })
    }

    fn cached<T: 'static + Send + Sync>(type_id: TypeId) -> Result<Option<Arc<T>>, AppError> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        match instances.get(&type_id) {
            Some(instance) => instance.clone().downcast::<T>().map(Some).map_err(|_| {
                AppError::InternalError(format!(
                    "Type mismatch in ServiceLocator: {}",
                    std::any::type_name::<T>()
                ))
            }),
            None => Ok(None),
        }
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Result<Arc<T>, AppError> {
        let clean_type_name = Self::extract_clean_type_name(type_name);

        let kind = if clean_type_name.ends_with("Repository") {
            ComponentKind::Repository
        } else if clean_type_name.ends_with("Service") {
            ComponentKind::Service
        } else {
            return Err(AppError::InternalError(format!(
                "Service not found: {}. Register it with inventory::submit! or ServiceLocator::set()",
                type_name
            )));
        };

        let key = normalize_name(&clean_type_name);
        let (registration_name, boxed) = match kind {
            ComponentKind::Repository => {
                let registration = REPOSITORY_NAME_CACHE.get(&key).ok_or_else(|| {
                    AppError::InternalError(format!("No repository found for entity: {}", key))
                })?;
                (registration.name, (registration.constructor)())
            }
            ComponentKind::Service => {
                let registration = SERVICE_NAME_CACHE.get(&key).ok_or_else(|| {
                    AppError::InternalError(format!("No service found for entity: {}", key))
                })?;
                (registration.name, (registration.constructor)())
            }
        };

        boxed
            .downcast::<Arc<T>>()
            .map(|arc| *arc)
            .map_err(|_| AppError::InternalError(format!("Type mismatch for: {}", registration_name)))
    }

    fn extract_clean_type_name(type_name: &str) -> String {
        match type_name.rfind("::") {
            Some(pos) => type_name[pos + 2..].to_string(),
            None => type_name.to_string(),
        }
    }

    /// 인프라 컴포넌트를 직접 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_id = TypeId::of::<T>();
        let clean_name = Self::extract_clean_type_name(std::any::type_name::<T>());

        println!("📦 Registering: {}", clean_name);

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_id, instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 생성하고 리포지토리 초기화를 수행합니다.
    pub async fn initialize_all() -> Result<(), AppError> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        if repo_count > 0 {
            print_step_start(1, "Creating Repository instances");
            for registration in repo_registrations {
                print_sub_task(registration.name, "Creating...");
                let _instance = (registration.constructor)();
                (registration.initializer)().await?;
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(1, "Repository instances created", repo_count);
        }

        let service_registrations: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = service_registrations.len();

        if service_count > 0 {
            print_step_start(2, "Creating Service instances");
            for registration in service_registrations {
                print_sub_task(registration.name, "Creating...");
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(2, "Service instances created", service_count);
        }

        print_final_summary(repo_count, service_count);

        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    struct PresenceProbe {
        label: &'static str,
    }

    #[test]
    fn test_normalize_name_matches_type_and_registration() {
        assert_eq!(normalize_name("ChallengeRewardService"), "challengereward");
        assert_eq!(normalize_name("challenge_reward_service"), "challengereward");
        assert_eq!(normalize_name("UserRepository"), "user");
        assert_eq!(normalize_name("user_repository"), "user");
        assert_eq!(normalize_name("payment_history_repository"), "paymenthistory");
        assert_eq!(normalize_name("PaymentHistoryRepository"), "paymenthistory");
    }

    #[test]
    fn test_extract_clean_type_name() {
        assert_eq!(
            ServiceLocator::extract_clean_type_name("dota_admin_backend::db::Database"),
            "Database"
        );
        assert_eq!(ServiceLocator::extract_clean_type_name("Database"), "Database");
    }

    #[test]
    fn test_set_then_get_returns_same_instance() {
        let probe = Arc::new(PresenceProbe { label: "probe" });
        ServiceLocator::set(probe.clone());

        let resolved = ServiceLocator::get::<PresenceProbe>();
        assert!(Arc::ptr_eq(&probe, &resolved));
        assert_eq!(resolved.label, "probe");
    }

    #[test]
    fn test_unregistered_type_is_an_error() {
        struct Unregistered;
        assert!(ServiceLocator::try_get::<Unregistered>().is_err());
    }
}
