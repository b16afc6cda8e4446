/// 인증 모드를 정의하는 열거형
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 인증이 반드시 필요함
    Required,
    /// 인증이 선택사항임 (있으면 검증, 없어도 허용)
    Optional,
}

/// 요구되는 역할 정보
#[derive(Debug, Clone)]
pub enum RequiredRole {
    /// 특정 단일 역할이 필요
    Single(String),
    /// 여러 역할 중 하나라도 있으면 허용 (OR 조건)
    Any(Vec<String>),
}

impl RequiredRole {
    /// 사용자 역할이 요구사항을 만족하는지 확인 (대소문자 무시)
    pub fn is_satisfied(&self, user_roles: &[String]) -> bool {
        let has = |role: &String| user_roles.iter().any(|r| r.eq_ignore_ascii_case(role));
        match self {
            RequiredRole::Single(required_role) => has(required_role),
            RequiredRole::Any(required_roles) => required_roles.iter().any(has),
        }
    }

    /// 403 응답의 `missingRole` 값
    pub fn describe(&self) -> String {
        match self {
            RequiredRole::Single(role) => role.clone(),
            RequiredRole::Any(roles) => roles.join(" 또는 "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_satisfied() {
        let roles = vec!["USER".to_string()];
        assert!(RequiredRole::Single("USER".to_string()).is_satisfied(&roles));
        assert!(RequiredRole::Single("user".to_string()).is_satisfied(&roles));
        assert!(!RequiredRole::Single("ADMIN".to_string()).is_satisfied(&roles));
        assert!(RequiredRole::Any(vec!["ADMIN".to_string(), "USER".to_string()]).is_satisfied(&roles));
        assert!(!RequiredRole::Any(vec![]).is_satisfied(&roles));
    }

    #[test]
    fn test_describe() {
        assert_eq!(RequiredRole::Single("ADMIN".to_string()).describe(), "ADMIN");
        assert_eq!(
            RequiredRole::Any(vec!["ADMIN".to_string(), "DEVELOPER".to_string()]).describe(),
            "ADMIN 또는 DEVELOPER"
        );
    }
}
