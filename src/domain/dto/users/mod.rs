//! # User Data Transfer Objects Module
//!
//! 인증과 사용자 관리 API의 요청/응답 구조입니다.
//!
//! ```text
//! users/
//! ├── request/
//! │   ├── auth_request.rs   # 회원가입, 로그인, 리프레시
//! │   └── user_request.rs   # 사용자 수정, 알림 설정, 권한 부여
//! └── response/
//!     └── user_response.rs  # UserResponse, LoginResponse
//! ```
//!
//! JSON 필드는 camelCase를 사용합니다. (`phoneNumber`, `refreshToken`)

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
