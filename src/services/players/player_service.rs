//! 플레이어 서비스

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::entities::players::Player,
    repositories::players::PlayerRepository,
};

static PLAYER_SERVICE_INSTANCE: OnceCell<Arc<PlayerService>> = OnceCell::new();

pub struct PlayerService {
    player_repo: Arc<PlayerRepository>,
}

impl PlayerService {
    fn new() -> Self {
        Self {
            player_repo: PlayerRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        PLAYER_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// # Errors
    ///
    /// * `AppError::ValidationError("Player name cannot be empty")`
    pub async fn create(&self, name: &str) -> Result<Player, AppError> {
        let player = Player::new(name);
        if !player.has_valid_name() {
            return Err(AppError::ValidationError("Player name cannot be empty".to_string()));
        }

        let player = self.player_repo.create(player).await?;
        log::info!("플레이어 생성: {}", player.display_name());
        Ok(player)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Player>, AppError> {
        self.player_repo.find_by_id(id).await
    }
}

fn player_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PlayerService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "player_service",
        constructor: player_service_constructor,
    }
}
