//! # Core Framework Module
//!
//! 관리자 백엔드 전역에서 사용하는 핵심 기능을 모아둔 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 싱글톤 컨테이너
//! - **ServiceLocator**: 타입 기반 전역 컨테이너
//! - **inventory 레지스트리**: 리포지토리/서비스 생성자 자동 수집
//! - **리포지토리 초기화**: 기동 시 인덱스 생성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: `ResponseError` 구현으로 상태 코드와 에러 코드 자동 매핑
//!
//! ## 새 컴포넌트 추가 절차
//!
//! 1. `static XXX_INSTANCE: OnceCell<Arc<Xxx>>` 선언
//! 2. `instance()`에서 `get_or_init`으로 생성
//! 3. 생성자 함수를 만들고 `inventory::submit!`으로 등록
//! 4. 다른 컴포넌트에서는 `ServiceLocator::get::<Xxx>()` 또는 `Xxx::instance()` 사용
//!
//! ```rust,ignore
//! static PLAYER_SERVICE_INSTANCE: OnceCell<Arc<PlayerService>> = OnceCell::new();
//!
//! impl PlayerService {
//!     pub fn instance() -> Arc<Self> {
//!         PLAYER_SERVICE_INSTANCE
//!             .get_or_init(|| Arc::new(Self::new()))
//!             .clone()
//!     }
//! }
//!
//! fn player_service_constructor() -> Box<dyn std::any::Any + Send + Sync> {
//!     Box::new(PlayerService::instance())
//! }
//!
//! inventory::submit! {
//!     crate::core::registry::ServiceRegistration {
//!         name: "player_service",
//!         constructor: player_service_constructor,
//!     }
//! }
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 참조 감지
//! ```text
//! Circular dependency detected: ChallengeService is already being initialized
//! ```
//! **해결**: 생성자에서 서로를 조회하지 않도록 의존 방향을 단방향으로 정리
//!
//! ### 미등록 타입 에러
//! ```text
//! No service found for entity: challengereward
//! ```
//! **해결**: `inventory::submit!` 등록 이름이 타입 이름과 일치하는지 확인

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
