use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::web::dto::levels::{LevelResponse, LevelsResponse};
use crate::web::error::{ErrorResponse, ResourceType};
use crate::web::{AppState, WebError, WebResult};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(levels_list_handler))
        .route("/{id}", get(levels_get_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/levels",
    description = "List every level with its unlock state, progress and earned badges",
    responses(
        (status = 200, description = "Levels listed", body = LevelsResponse),
    ),
    tag = "levels"
)]
async fn levels_list_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let campaign = state.campaign().read().await;
    Ok((StatusCode::OK, Json(LevelsResponse::from(&*campaign))))
}

#[utoipa::path(
    get,
    path = "/api/v1/levels/{level_id}",
    description = "Fetch one level with its content outline",
    params(
        ("level_id" = u32, Path, description = "ID of the level to get")
    ),
    responses(
        (status = 200, description = "Level found", body = LevelResponse),
        (status = 404, description = "Level not found", body = ErrorResponse),
    ),
    tag = "levels"
)]
async fn levels_get_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> WebResult<impl IntoResponse> {
    let campaign = state.campaign().read().await;
    let level = campaign
        .entry(id)
        .map(LevelResponse::from)
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Level))?;

    Ok((StatusCode::OK, Json(level)))
}
