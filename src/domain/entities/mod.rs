//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 대응되는 핵심 엔티티들입니다.
//!
//! ```text
//! entities/
//! ├── users/       ← 회원 (users)
//! ├── roles/       ← 역할과 권한 (roles, authorities)
//! ├── challenges/  ← 챌린지와 챌린지 포상 (challenges, challenge_rewards)
//! ├── rewards/     ← 외부 정산 포상 이력 (reward_histories)
//! ├── payments/    ← 결제 이력 (payment_histories)
//! ├── documents/   ← 가이드/공지 문서 (documents)
//! ├── players/     ← 플레이어 (players)
//! └── tokens/      ← 리프레시 토큰 (refresh_tokens)
//! ```
//!
//! 모든 엔티티는 `_id`를 `Option<ObjectId>`로 가지며, 저장 전에는 `None`입니다.
//! 다른 엔티티를 참조할 때는 ObjectId의 hex 문자열을 사용합니다.

pub mod challenges;
pub mod documents;
pub mod payments;
pub mod players;
pub mod rewards;
pub mod roles;
pub mod tokens;
pub mod users;
