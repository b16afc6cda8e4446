use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::documents::{DocumentContent, DocumentStatus};

/// 문서 생성/수정 요청
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[validate(length(min = 1, max = 200, message = "제목은 1-200자 사이여야 합니다"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "슬러그는 1-100자 사이여야 합니다"))]
    pub slug: String,

    #[serde(default)]
    pub content: String,

    #[validate(length(max = 500, message = "설명은 500자를 초과할 수 없습니다"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "카테고리는 50자를 초과할 수 없습니다"))]
    pub category: Option<String>,

    pub status: Option<DocumentStatus>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub display_order: i32,

    #[validate(length(max = 100, message = "아이콘은 100자를 초과할 수 없습니다"))]
    pub icon: Option<String>,

    #[validate(length(max = 200, message = "태그는 200자를 초과할 수 없습니다"))]
    pub tags: Option<String>,
}

impl From<DocumentRequest> for DocumentContent {
    /// 상태가 없으면 DRAFT
    fn from(req: DocumentRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            content: req.content,
            description: req.description,
            category: req.category,
            status: req.status.unwrap_or(DocumentStatus::Draft),
            is_featured: req.is_featured,
            display_order: req.display_order,
            icon: req.icon,
            tags: req.tags,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    crate::domain::dto::common::DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_draft() {
        let req: DocumentRequest =
            serde_json::from_str(r#"{"title":"가이드","slug":"guide","content":"..."}"#).unwrap();
        assert!(req.validate().is_ok());

        let content: DocumentContent = req.into();
        assert_eq!(content.status, DocumentStatus::Draft);
        assert_eq!(content.display_order, 0);
    }

    #[test]
    fn test_slug_required() {
        let req: DocumentRequest = serde_json::from_str(r#"{"title":"가이드","slug":""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
