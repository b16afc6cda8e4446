//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 `OnceCell` 기반 싱글톤이며 `inventory`로 `ServiceLocator`에 등록됩니다.
//! 리포지토리는 생성자에서 `XRepository::instance()`로 주입받습니다.
//!
//! | 모듈 | 서비스 |
//! |------|--------|
//! | `auth` | TokenService, RefreshTokenService |
//! | `users` | UserService |
//! | `roles` | RoleService, AuthorityService |
//! | `challenges` | ChallengeService, ChallengeRewardService |
//! | `rewards` | RewardService, RewardHistoryService |
//! | `payments` | PaymentHistoryService |
//! | `documents` | DocumentService |
//! | `players` | PlayerService |
//! | `presence` | PresenceService (인메모리) |
//! | `notifications` | 이메일/카카오 가입 알림 |
//! | `seed` | SeedService (초기 데이터, 테스트 데이터 API) |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{auth::TokenService, users::UserService};
//!
//! let user_service = UserService::instance();
//! let token_service = TokenService::instance();
//! ```

pub mod auth;
pub mod challenges;
pub mod documents;
pub mod notifications;
pub mod payments;
pub mod players;
pub mod presence;
pub mod rewards;
pub mod roles;
pub mod seed;
pub mod users;
