//! CORS 허용 Origin 설정
//!
//! 운영 도메인(`dota-task.shop`), 로컬 개발 서버, 프리뷰 배포(Vercel/Netlify)를 허용합니다.

use std::env;

/// 서비스 운영 도메인
pub const SERVICE_DOMAIN: &str = "dota-task.shop";

const PREVIEW_DOMAINS: [&str; 2] = ["vercel.app", "netlify.app"];
const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

pub const ALLOWED_METHODS: [&str; 6] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"];

pub const MAX_AGE_SECONDS: usize = 3600;

pub struct CorsConfig;

impl CorsConfig {
    /// `CORS_EXTRA_ORIGINS`에 쉼표로 나열된 추가 Origin
    pub fn extra_origins() -> Vec<String> {
        env::var("CORS_EXTRA_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_allowed_origin(origin: &str) -> bool {
        Self::is_allowed_origin_with(origin, &Self::extra_origins())
    }

    /// Origin 허용 여부
    ///
    /// - `http(s)://localhost[:port]`, `http(s)://127.0.0.1[:port]`
    /// - `https://dota-task.shop`, `https://*.dota-task.shop`
    /// - `https://*.vercel.app`, `https://*.netlify.app`
    /// - `extra`에 포함된 Origin (정확히 일치)
    pub fn is_allowed_origin_with(origin: &str, extra: &[String]) -> bool {
        if extra.iter().any(|allowed| allowed == origin) {
            return true;
        }

        let Some((scheme, authority)) = origin.split_once("://") else {
            return false;
        };

        if authority.is_empty() || authority.contains('/') || authority.contains('@') {
            return false;
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        };

        if let Some(port) = port {
            if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
        }

        if LOOPBACK_HOSTS.contains(&host) {
            return scheme == "http" || scheme == "https";
        }

        if scheme != "https" || port.is_some() {
            return false;
        }

        host == SERVICE_DOMAIN
            || is_subdomain_of(host, SERVICE_DOMAIN)
            || PREVIEW_DOMAINS.iter().any(|domain| is_subdomain_of(host, domain))
    }
}

fn is_subdomain_of(host: &str, domain: &str) -> bool {
    match host.strip_suffix(domain).and_then(|prefix| prefix.strip_suffix('.')) {
        Some(label) => {
            !label.is_empty()
                && !label.starts_with('.')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(origin: &str) -> bool {
        CorsConfig::is_allowed_origin_with(origin, &[])
    }

    #[test]
    fn test_service_domain_and_subdomains() {
        assert!(allowed("https://dota-task.shop"));
        assert!(allowed("https://www.dota-task.shop"));
        assert!(allowed("https://admin.dota-task.shop"));
        assert!(!allowed("http://dota-task.shop"));
        assert!(!allowed("https://evil-dota-task.shop"));
        assert!(!allowed("https://dota-task.shop.evil.com"));
    }

    #[test]
    fn test_loopback_any_port() {
        assert!(allowed("http://localhost:3000"));
        assert!(allowed("http://localhost:3003"));
        assert!(allowed("https://localhost:8443"));
        assert!(allowed("http://127.0.0.1:3000"));
        assert!(allowed("http://localhost"));
        assert!(!allowed("ftp://localhost:3000"));
        assert!(!allowed("http://localhost:abc"));
    }

    #[test]
    fn test_preview_deployments() {
        assert!(allowed("https://dota-admin.vercel.app"));
        assert!(allowed("https://deploy-preview-12--dota.netlify.app"));
        assert!(!allowed("https://vercel.app"));
        assert!(!allowed("http://dota-admin.vercel.app"));
    }

    #[test]
    fn test_rejects_malformed_origins() {
        assert!(!allowed(""));
        assert!(!allowed("dota-task.shop"));
        assert!(!allowed("https://"));
        assert!(!allowed("https://dota-task.shop/path"));
        assert!(!allowed("https://user@dota-task.shop"));
    }

    #[test]
    fn test_extra_origins_are_exact_matches() {
        let extra = vec!["https://partner.example.com".to_string()];
        assert!(CorsConfig::is_allowed_origin_with("https://partner.example.com", &extra));
        assert!(!CorsConfig::is_allowed_origin_with("https://other.example.com", &extra));
    }
}
