use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State, response::IntoResponse};
use tokio::time::Instant;
use uuid::Uuid;

use crate::game::{GameEvent, LevelRun};
use crate::web::dto::runs::{
    AnswerRequest, ContinueResponse, PlaybackRequest, RunResponse, StartRunRequest,
};
use crate::web::error::{ErrorResponse, ResourceType};
use crate::web::state::RunRecord;
use crate::web::{AppState, WebError, WebResult};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(runs_create_handler))
        .route("/{id}", get(runs_get_handler).delete(runs_delete_handler))
        .route("/{id}/start", post(runs_start_handler))
        .route("/{id}/segment/end", post(runs_segment_end_handler))
        .route("/{id}/playback", post(runs_playback_handler))
        .route("/{id}/targets/{target_id}", post(runs_click_target_handler))
        .route("/{id}/answer", post(runs_answer_handler))
        .route("/{id}/quiz/restart", post(runs_quiz_restart_handler))
        .route("/{id}/continue", post(runs_continue_handler))
        .with_state(state)
}

/// Polls the run, applies `action` and records a finished level in the campaign.
async fn apply<F>(state: &AppState, id: Uuid, action: F) -> WebResult<RunResponse>
where
    F: FnOnce(&mut LevelRun, Instant) -> Vec<GameEvent>,
{
    let now = state.now();
    let mut runs = state.runs().write().await;
    let record = runs
        .get_mut(&id)
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Run))?;

    let mut events = record.run_mut().poll(now);
    events.extend(action(record.run_mut(), now));

    if record.run().is_complete() && record.destination().is_none() {
        let level_id = record.run().level().id();
        let destination = state.campaign().write().await.complete(level_id)?;
        record.set_destination(destination);
    }

    Ok(RunResponse::new(id, record, &events))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs",
    description = "Start playing a level",
    request_body = StartRunRequest,
    responses(
        (status = 201, description = "Run created", body = RunResponse),
        (status = 403, description = "Level is locked", body = ErrorResponse),
        (status = 404, description = "Level not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_create_handler(
    State(state): State<AppState>,
    Json(req): Json<StartRunRequest>,
) -> WebResult<impl IntoResponse> {
    let run = {
        let campaign = state.campaign().read().await;
        campaign.start(req.level_id, state.timing())?
    };

    let id = Uuid::new_v4();
    let record = RunRecord::new(run);
    let response = RunResponse::new(id, &record, &[]);
    state.runs().write().await.insert(id, record);

    tracing::info!("run {} started for level {}", id, req.level_id);
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/runs/{run_id}",
    description = "Fetch the current state of a run, applying transitions that became due",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Run found", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |_, _| vec![]).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/runs/{run_id}",
    description = "Discard a run",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Run discarded"),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    state
        .runs()
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Run))?;

    tracing::debug!("run {} discarded", id);
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/start",
    description = "Leave the intro screen",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Trigger applied (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_start_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, now| run.start(now)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/segment/end",
    description = "Report that the current video segment has ended",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Trigger applied (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_segment_end_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, now| run.end_segment(now)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/playback",
    description = "Play, pause or replay the current video segment",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    request_body = PlaybackRequest,
    responses(
        (status = 200, description = "Control applied (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_playback_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PlaybackRequest>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, _| {
        run.playback(req.control);
        vec![]
    })
    .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/targets/{target_id}",
    description = "Click a target on the mini-game board",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run"),
        ("target_id" = u32, Path, description = "ID of the clicked target")
    ),
    responses(
        (status = 200, description = "Click applied (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_click_target_handler(
    State(state): State<AppState>,
    Path((id, target_id)): Path<(Uuid, u32)>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, now| run.click_target(target_id, now)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/answer",
    description = "Answer the current quiz question",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer applied (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_answer_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, now| run.submit_answer(req.option_index, now)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/quiz/restart",
    description = "Start the quiz over after a wrong answer",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Quiz restarted (or ignored)", body = RunResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_quiz_restart_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |run, now| run.restart_quiz(now)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/runs/{run_id}/continue",
    description = "Leave a finished level. The run is discarded and the next destination returned",
    params(
        ("run_id" = Uuid, Path, description = "ID of the run")
    ),
    responses(
        (status = 200, description = "Destination (absent while the level is not finished)", body = ContinueResponse),
        (status = 404, description = "Run not found", body = ErrorResponse),
    ),
    tag = "runs"
)]
async fn runs_continue_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let response = apply(&state, id, |_, _| vec![]).await?;

    if response.destination.is_some() {
        state.runs().write().await.remove(&id);
        tracing::debug!("run {} left with {:?}", id, response.destination);
    }

    Ok((
        StatusCode::OK,
        Json(ContinueResponse {
            destination: response.destination,
        }),
    ))
}
