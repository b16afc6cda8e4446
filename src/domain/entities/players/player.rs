use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

pub const ANONYMOUS_PLAYER: &str = "Anonymous Player";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Player {
    pub fn new(name: &str) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn has_valid_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Player name cannot be empty".to_string()));
        }
        self.name = name.to_string();
        self.updated_at = DateTime::now();
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        if self.has_valid_name() {
            &self.name
        } else {
            ANONYMOUS_PLAYER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Player::new("  ").display_name(), "Anonymous Player");
        assert_eq!(Player::new(" pudge ").display_name(), "pudge");
    }

    #[test]
    fn test_update_name() {
        let mut player = Player::new("a");
        assert!(player.update_name("   ").is_err());
        assert_eq!(player.name, "a");

        player.update_name(" invoker ").unwrap();
        assert_eq!(player.name, "invoker");
        assert!(player.has_valid_name());
    }
}
