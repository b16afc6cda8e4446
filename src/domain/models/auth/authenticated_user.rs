use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::users::ROLE_ADMIN;

/// JWT 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (ObjectId hex)
    pub user_id: String,

    pub email: String,

    /// 사용자 역할 목록. 현재는 역할 하나만 담깁니다.
    pub roles: Vec<String>,

    /// 역할 권한과 직접 부여된 권한
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl AuthenticatedUser {
    /// 특정 역할을 보유하고 있는지 확인 (대소문자 무시)
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// 여러 역할 중 하나라도 보유하고 있는지 확인
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// 대표 역할 이름
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증이 필요합니다.".to_string(),
            )
            .into())),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            roles: vec![role.to_string()],
            authorities: vec!["USER_READ".to_string()],
        }
    }

    #[test]
    fn test_role_checks() {
        let admin = user("ADMIN");
        assert!(admin.is_admin());
        assert!(admin.has_role("admin"));
        assert!(admin.has_any_role(&["DEVELOPER", "ADMIN"]));
        assert_eq!(admin.primary_role(), Some("ADMIN"));

        let plain = user("USER");
        assert!(!plain.is_admin());
        assert!(plain.has_authority("USER_READ"));
        assert!(!plain.has_authority("USER_WRITE"));
    }

    #[actix_web::test]
    async fn test_extractors() {
        let req = TestRequest::default().to_http_request();
        let mut payload = actix_web::dev::Payload::None;
        assert!(AuthenticatedUser::from_request(&req, &mut payload).await.is_err());
        assert!(OptionalUser::from_request(&req, &mut payload).await.unwrap().0.is_none());

        req.extensions_mut().insert(user("USER"));
        let extracted = AuthenticatedUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(extracted.user_id, "u1");
        assert!(OptionalUser::from_request(&req, &mut payload).await.unwrap().0.is_some());
    }
}
