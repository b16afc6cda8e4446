//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청을 검증하고 서비스 싱글톤에 위임한 뒤 JSON으로 응답합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (관리자 웹, 결제 시스템)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Middlewares - CORS, Rate limit, AuthMiddleware
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근 (MongoDB, Redis)     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 작성 패턴
//!
//! ```rust,ignore
//! #[post("/{challenge_id}/participate")]
//! pub async fn participate(
//!     challenge_id: web::Path<String>,
//!     user: AuthenticatedUser,          // AuthMiddleware가 넣어 둔 사용자
//! ) -> Result<HttpResponse, AppError> {
//!     let challenge = ChallengeService::instance()
//!         .participate(&challenge_id, &user.user_id)
//!         .await?;                       // 규칙 위반은 400 응답으로 변환
//!     Ok(HttpResponse::Ok().json(json!({ "success": true, ... })))
//! }
//! ```
//!
//! - 요청 DTO는 `validator`로 검증합니다: `payload.validate()?`
//! - 모든 에러는 `AppError`로 모여 일관된 JSON 본문이 됩니다.
//!
//! ## 모듈 구성
//!
//! | 모듈 | 경로 |
//! |------|------|
//! | `auth` | `/api/auth/*` |
//! | `users` | `/api/users/*`, `/api/me/*` |
//! | `roles` | `/api/admin/roles/*`, `/api/admin/authorities/*` |
//! | `challenges` | `/api/challenges/*` (포상 포함) |
//! | `rewards` | `/api/rewards/*`, `/api/reward-histories/*`, `/api/payment-histories/*` |
//! | `documents` | `/api/documents/public/*`, `/api/documents/admin/*` |
//! | `players` | `/api/players/*` |
//! | `presence` | `/api/presence/*` |
//! | `ws` | `/ws` (접속 상태 WebSocket) |
//! | `data` | `/api/data/*` |

pub mod auth;
pub mod challenges;
pub mod data;
pub mod documents;
pub mod players;
pub mod presence;
pub mod rewards;
pub mod roles;
pub mod users;
pub mod ws;
