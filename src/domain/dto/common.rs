//! 여러 API가 공유하는 페이지네이션/시간 표현

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 1000;
pub const MAX_PAGE: u64 = 100_000;

/// `?page=&size=` 쿼리. page는 0부터 시작합니다.
///
/// 핸들러는 서비스 호출 전에 `validate()`로 범위를 확인합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default)]
    #[validate(range(max = 100000, message = "page는 0 이상 100000 이하여야 합니다"))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 1000, message = "size는 1 이상 1000 이하여야 합니다"))]
    pub size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// size는 1..=1000으로 보정됩니다.
    pub fn size(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// 검증을 거치지 않은 값도 `MAX_PAGE`로 보정해 계산합니다.
    pub fn skip(&self) -> u64 {
        self.page.min(MAX_PAGE) * self.size()
    }
}

/// 페이지 응답 본문
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn new(content: Vec<T>, query: &PageQuery, total_elements: u64) -> Self {
        let size = query.size();
        Self {
            content,
            page: query.page,
            size,
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    pub fn map<U, F>(self, f: F) -> PageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// BSON 시각을 RFC 3339 문자열로 변환합니다.
pub fn format_datetime(dt: &DateTime) -> String {
    dt.try_to_rfc3339_string().unwrap_or_default()
}

pub fn format_optional_datetime(dt: &Option<DateTime>) -> Option<String> {
    dt.as_ref().map(format_datetime)
}

/// 응답 envelope의 `timestamp` 값
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_math() {
        let query = PageQuery { page: 2, size: 10 };
        assert_eq!(query.skip(), 20);

        let page = PageResponse::new(vec![1, 2, 3], &query, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);

        let empty: PageResponse<i32> = PageResponse::new(vec![], &PageQuery::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(PageQuery { page: 0, size: 0 }.size(), 1);
        assert_eq!(PageQuery { page: 0, size: 5000 }.size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_bounds_are_validated() {
        assert!(PageQuery { page: 0, size: 20 }.validate().is_ok());
        assert!(PageQuery { page: MAX_PAGE, size: MAX_PAGE_SIZE }.validate().is_ok());
        assert!(PageQuery { page: u64::MAX, size: 20 }.validate().is_err());
        assert!(PageQuery { page: 0, size: 0 }.validate().is_err());
        assert!(PageQuery { page: 0, size: 5000 }.validate().is_err());
    }

    #[test]
    fn test_skip_stays_bounded() {
        let query = PageQuery { page: u64::MAX, size: u64::MAX };
        assert_eq!(query.skip(), MAX_PAGE * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_json_shape() {
        let page = PageResponse::new(vec!["a"], &PageQuery::default(), 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["content"][0], "a");
    }

    #[test]
    fn test_format_datetime() {
        let dt = DateTime::from_millis(0);
        assert_eq!(format_datetime(&dt), "1970-01-01T00:00:00Z");
    }
}
