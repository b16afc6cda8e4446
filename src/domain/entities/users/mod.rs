//! Users Entity Module
//!
//! 회원 엔티티와 직접 부여 권한(`AuthorityGrant`)을 정의합니다.
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{User, ROLE_USER};
//!
//! let user = User::new(username, email, password_hash, ROLE_USER);
//! ```

pub mod user;

pub use user::*;
