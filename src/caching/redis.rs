//! Redis 캐시 클라이언트
//!
//! 리포지토리의 cache-aside 계층에서 사용하는 얇은 래퍼입니다.
//! 값은 JSON 문자열로 저장됩니다.
//!
//! 연결은 시작 시 한 번 만든 [`ConnectionManager`]를 복제해서 사용하며,
//! 끊어지면 매니저가 재연결합니다.

use std::env;

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

/// SCAN 한 번에 요청하는 키 개수 힌트
const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

fn serialization_error(what: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, what, e.to_string()))
}

impl RedisClient {
    /// `REDIS_URL`(기본 `redis://localhost:6379`)로 연결하고 PING으로 확인합니다.
    pub async fn new() -> Result<Self, redis::RedisError> {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;
        let mut manager = ConnectionManager::new(client).await?;
        redis::cmd("PING").query_async::<()>(&mut manager).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.connection();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| serialization_error("Deserialization failed", e)),
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.connection();
        let json =
            serde_json::to_string(value).map_err(|e| serialization_error("Serialization failed", e))?;

        conn.set_ex(key, json, seconds).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.connection();
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection();
        conn.del(keys).await
    }

    /// 패턴에 맞는 키를 SCAN으로 찾아 배치 단위로 삭제합니다.
    ///
    /// KEYS와 달리 서버를 막지 않습니다. 삭제된 키 수를 돌려줍니다.
    pub async fn del_pattern(&self, pattern: &str) -> Result<usize, redis::RedisError> {
        let mut conn = self.connection();
        let mut cursor: u64 = 0;
        let mut deleted = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = scan_command(cursor, pattern)
                .query_async(&mut conn)
                .await?;

            deleted += keys.len();
            self.del_multiple(&keys).await?;

            if next == 0 {
                break;
            }
            cursor = next;
        }

        log::debug!("캐시 키 {}개 삭제: {}", deleted, pattern);
        Ok(deleted)
    }
}

fn scan_command(cursor: u64, pattern: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("SCAN");
    cmd.arg(cursor).arg("MATCH").arg(pattern).arg("COUNT").arg(SCAN_BATCH);
    cmd
}
