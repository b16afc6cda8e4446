use serde::Serialize;

use crate::domain::dto::common::format_datetime;
use crate::domain::entities::documents::{Document, DocumentStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: DocumentStatus,
    pub view_count: i64,
    pub is_featured: bool,
    pub display_order: i32,
    pub icon: Option<String>,
    pub tags: Option<String>,
    pub tags_array: Vec<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id_string().unwrap_or_default(),
            tags_array: doc.tag_list(),
            created_at: format_datetime(&doc.created_at),
            updated_at: format_datetime(&doc.updated_at),
            title: doc.title,
            slug: doc.slug,
            content: doc.content,
            description: doc.description,
            category: doc.category,
            status: doc.status,
            view_count: doc.view_count,
            is_featured: doc.is_featured,
            display_order: doc.display_order,
            icon: doc.icon,
            tags: doc.tags,
            created_by: doc.created_by,
            updated_by: doc.updated_by,
        }
    }
}
