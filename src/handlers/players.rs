//! 플레이어 핸들러
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    core::errors::AppError,
    domain::dto::common::format_datetime,
    services::players::PlayerService,
};

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    #[serde(default)]
    pub name: String,
}

/// `POST /api/players?name=`
#[post("")]
pub async fn create_player(query: web::Query<PlayerQuery>) -> Result<HttpResponse, AppError> {
    let player = PlayerService::instance().create(&query.name).await?;

    Ok(HttpResponse::Created().json(json!({
        "id": player.id_string(),
        "name": player.display_name(),
        "createdAt": format_datetime(&player.created_at),
        "updatedAt": format_datetime(&player.updated_at),
    })))
}

#[get("/hello")]
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok().body("Hello from backend")
}
