use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{parse_object_id, Database},
    domain::entities::players::Player,
};

const COLLECTION: &str = "players";

static PLAYER_REPOSITORY_INSTANCE: OnceCell<Arc<PlayerRepository>> = OnceCell::new();

pub struct PlayerRepository {
    db: Arc<Database>,
}

impl PlayerRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        PLAYER_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<Player> {
        self.db.collection::<Player>(COLLECTION)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Player>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut player: Player) -> Result<Player, AppError> {
        let result = self
            .collection()
            .insert_one(&player)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        player.id = result.inserted_id.as_object_id();
        Ok(player)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .name("name".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([name_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for PlayerRepository {
    fn name(&self) -> &str {
        "player"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn player_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PlayerRepository::instance())
}

fn player_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { PlayerRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "player_repository",
        constructor: player_repository_constructor,
        initializer: player_repository_initializer,
    }
}
