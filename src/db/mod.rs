//! MongoDB 연결 관리 모듈
//!
//! 애플리케이션 전역에서 공유하는 MongoDB 클라이언트를 제공합니다.
//! 기동 시 한 번 생성되어 `ServiceLocator`에 등록되며,
//! 각 리포지토리는 `collection()`으로 자신의 컬렉션 핸들을 얻습니다.

use std::env;

use log::info;
use mongodb::{bson::oid::ObjectId, options::ClientOptions, Client, Collection};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::AppError;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수로 MongoDB에 연결하고 `ping`으로 가용성을 확인합니다.
    ///
    /// | 변수 | 기본값 |
    /// |------|--------|
    /// | `MONGODB_URI` | `mongodb://localhost:27017` |
    /// | `DATABASE_NAME` | `dota_admin_dev` |
    pub async fn new() -> Result<Self, AppError> {
        let mongodb_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name =
            env::var("DATABASE_NAME").unwrap_or_else(|_| "dota_admin_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("dota_admin_backend".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.get_database().collection::<T>(name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

/// 16진수 ObjectId 문자열을 파싱합니다.
///
/// # Errors
///
/// * `AppError::ValidationError` - 24자리 16진수가 아님
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::ValidationError(format!("유효하지 않은 ID 형식입니다: {}", id)))
}

/// unique 인덱스 위반(E11000) 여부
pub fn is_duplicate_key_error(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => error.to_string().contains("E11000"),
    }
}

const DUPLICATE_KEY_CODE: i32 = 11000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_object_id(&format!(" {} ", id.to_hex())).unwrap(), id);

        match parse_object_id("42") {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("42")),
            _ => panic!("Expected ValidationError"),
        }
    }
}
