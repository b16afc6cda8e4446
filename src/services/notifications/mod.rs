//! 회원 가입 알림 서비스
//!
//! ```text
//! UserService::register ─► MemberJoinListenerService::publish (spawn)
//!                               ├─► EmailNotificationService ─► EmailClientService (HTTP API)
//!                               └─► KakaoNotificationService ─► Kakao memo API
//! ```

pub mod email_client;
pub mod email_notification_service;
pub mod kakao_notification_service;
pub mod member_join_listener;

pub use email_client::*;
pub use email_notification_service::*;
pub use kakao_notification_service::*;
pub use member_join_listener::*;
