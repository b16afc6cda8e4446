//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 각 리포지토리는 `OnceCell` 싱글톤이며 `inventory`로 등록되어
//! 기동 시 `ServiceLocator::initialize_all()`에서 인덱스를 생성합니다.
//! MongoDB를 주 저장소로 사용하고 사용자 조회는 Redis로 캐싱합니다.
//!
//! | 리포지토리 | 컬렉션 | unique 인덱스 |
//! |------------|--------|---------------|
//! | `UserRepository` | `users` | email, username, phone_number(있을 때) |
//! | `RoleRepository` | `roles` | name |
//! | `AuthorityRepository` | `authorities` | name |
//! | `ChallengeRepository` | `challenges` | |
//! | `ChallengeRewardRepository` | `challenge_rewards` | |
//! | `RewardHistoryRepository` | `reward_histories` | (challenge_id, participant_id) |
//! | `PaymentHistoryRepository` | `payment_histories` | payment_id |
//! | `DocumentRepository` | `documents` | slug |
//! | `PlayerRepository` | `players` | |
//! | `RefreshTokenRepository` | `refresh_tokens` | (TTL: expires_at) |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! let user = user_repo.find_by_email("user@example.com").await?;
//! ```

pub mod challenges;
pub mod documents;
pub mod payments;
pub mod players;
pub mod rewards;
pub mod roles;
pub mod tokens;
pub mod users;
