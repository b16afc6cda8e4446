//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 cache-aside 지원을 제공합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("user:email:a@b.com", &user, 600).await?;
//! let cached: Option<User> = cache.get("user:email:a@b.com").await?;
//! cache.del_pattern("user:*").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
