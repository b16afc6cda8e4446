//! 문서(가이드/공지) 엔티티

use std::fmt;
use std::str::FromStr;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::utils::string_utils::split_comma_separated;

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const CATEGORY_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::Published => "PUBLISHED",
            DocumentStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(DocumentStatus::Draft),
            "PUBLISHED" => Ok(DocumentStatus::Published),
            "ARCHIVED" => Ok(DocumentStatus::Archived),
            _ => Err(AppError::ValidationError(format!("Invalid status: {}", s))),
        }
    }
}

/// 생성/수정 시 입력값
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: DocumentStatus,
    pub is_featured: bool,
    pub display_order: i32,
    pub icon: Option<String>,
    pub tags: Option<String>,
}

impl DocumentContent {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::ValidationError("제목은 필수입니다".to_string()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "제목은 {}자를 초과할 수 없습니다",
                TITLE_MAX_LEN
            )));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::ValidationError("슬러그는 필수입니다".to_string()));
        }
        if self.slug.chars().count() > SLUG_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "슬러그는 {}자를 초과할 수 없습니다",
                SLUG_MAX_LEN
            )));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_LEN)
        {
            return Err(AppError::ValidationError(format!(
                "설명은 {}자를 초과할 수 없습니다",
                DESCRIPTION_MAX_LEN
            )));
        }
        if self
            .category
            .as_ref()
            .is_some_and(|c| c.chars().count() > CATEGORY_MAX_LEN)
        {
            return Err(AppError::ValidationError(format!(
                "카테고리는 {}자를 초과할 수 없습니다",
                CATEGORY_MAX_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// 쉼표 구분 태그 문자열
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Document {
    pub fn new(content: DocumentContent, created_by: Option<String>) -> Result<Self, AppError> {
        content.validate()?;
        let now = DateTime::now();

        Ok(Self {
            id: None,
            title: content.title.trim().to_string(),
            slug: content.slug.trim().to_string(),
            content: content.content,
            description: content.description,
            category: content.category,
            status: content.status,
            view_count: 0,
            is_featured: content.is_featured,
            display_order: content.display_order,
            icon: content.icon,
            tags: content.tags,
            updated_by: created_by.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// 조회수와 작성자는 유지됩니다.
    pub fn apply(&mut self, content: DocumentContent, updated_by: Option<String>) -> Result<(), AppError> {
        content.validate()?;

        self.title = content.title.trim().to_string();
        self.slug = content.slug.trim().to_string();
        self.content = content.content;
        self.description = content.description;
        self.category = content.category;
        self.status = content.status;
        self.is_featured = content.is_featured;
        self.display_order = content.display_order;
        self.icon = content.icon;
        self.tags = content.tags;
        self.updated_by = updated_by;
        self.updated_at = DateTime::now();
        Ok(())
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn increment_view_count(&mut self) {
        self.view_count += 1;
    }

    pub fn is_published(&self) -> bool {
        self.status == DocumentStatus::Published
    }

    pub fn publish(&mut self) {
        self.set_status(DocumentStatus::Published);
    }

    pub fn archive(&mut self) {
        self.set_status(DocumentStatus::Archived);
    }

    pub fn make_draft(&mut self) {
        self.set_status(DocumentStatus::Draft);
    }

    fn set_status(&mut self, status: DocumentStatus) {
        self.status = status;
        self.updated_at = DateTime::now();
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(split_comma_separated)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(title: &str, slug: &str) -> DocumentContent {
        DocumentContent {
            title: title.to_string(),
            slug: slug.to_string(),
            content: "본문".to_string(),
            description: None,
            category: Some("guide".to_string()),
            status: DocumentStatus::Draft,
            is_featured: false,
            display_order: 0,
            icon: None,
            tags: Some("rust, actix,, ,mongo".to_string()),
        }
    }

    #[test]
    fn test_tag_list_drops_empty_entries() {
        let doc = Document::new(content("시작하기", "getting-started"), None).unwrap();
        assert_eq!(doc.tag_list(), vec!["rust", "actix", "mongo"]);
    }

    #[test]
    fn test_status_transitions_and_view_count() {
        let mut doc = Document::new(content("시작하기", "getting-started"), Some("a@b.c".to_string())).unwrap();
        assert!(!doc.is_published());

        doc.publish();
        assert!(doc.is_published());
        doc.increment_view_count();
        doc.increment_view_count();
        assert_eq!(doc.view_count, 2);

        doc.archive();
        assert_eq!(doc.status, DocumentStatus::Archived);
        doc.make_draft();
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.created_by, doc.updated_by);
    }

    #[test]
    fn test_length_limits() {
        assert!(Document::new(content(&"가".repeat(201), "s"), None).is_err());
        assert!(Document::new(content("t", &"s".repeat(101)), None).is_err());
        assert!(Document::new(content("  ", "s"), None).is_err());
        assert!(Document::new(content(&"가".repeat(200), &"s".repeat(100)), None).is_ok());
    }

    #[test]
    fn test_apply_keeps_view_count() {
        let mut doc = Document::new(content("a", "a"), None).unwrap();
        doc.increment_view_count();
        doc.apply(content("b", "b"), Some("editor".to_string())).unwrap();

        assert_eq!(doc.title, "b");
        assert_eq!(doc.view_count, 1);
        assert_eq!(doc.updated_by.as_deref(), Some("editor"));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("published".parse::<DocumentStatus>().unwrap(), DocumentStatus::Published);
        assert!("DELETED".parse::<DocumentStatus>().is_err());
    }
}
