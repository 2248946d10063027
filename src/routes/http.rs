//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Mutating handlers reply with the refreshed workspace so the client never
//! needs a follow-up fetch to see updated diagnostics.

use std::sync::Arc;
use axum::{extract::{Query, State}, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_formats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let formats = state.list_formats().await;
  info!(target: "format", count = formats.len(), "HTTP formats listed");
  Json(formats)
}

#[instrument(level = "info", skip(state), fields(%q.format_id))]
pub async fn http_get_format(
  State(state): State<Arc<AppState>>,
  Query(q): Query<FormatQuery>,
) -> AppResult<impl IntoResponse> {
  let format = state
    .get_format(&q.format_id)
    .await
    .ok_or_else(|| AppError::UnknownFormat(q.format_id.clone()))?;
  Ok(Json(format))
}

#[instrument(level = "info", skip(state, body), fields(name = %body.name))]
pub async fn http_save_format(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FormatIn>,
) -> impl IntoResponse {
  let saved = state.save_format(format_from_in(body)).await;
  Json(saved)
}

#[instrument(level = "info", skip(state), fields(%body.format_id))]
pub async fn http_delete_format(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DeleteFormatIn>,
) -> AppResult<impl IntoResponse> {
  if !state.delete_format(&body.format_id).await {
    return Err(AppError::UnknownFormat(body.format_id));
  }
  Ok(Json(DeleteFormatOut { deleted: true }))
}

#[instrument(level = "info", skip(state), fields(%q.format_id))]
pub async fn http_get_workspace(
  State(state): State<Arc<AppState>>,
  Query(q): Query<FormatQuery>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::workspace_view(&state, &q.format_id).await?;
  info!(
    target: "workspace",
    format_id = %q.format_id,
    questions = workspace.total_questions,
    clusters = workspace.clusters.len(),
    "HTTP workspace served"
  );
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id))]
pub async fn http_post_prompt(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PromptIn>,
) -> AppResult<impl IntoResponse> {
  let workspace =
    logic::edit_prompt(&state, &body.format_id, &body.question_id, &body.prompt).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id))]
pub async fn http_post_lock(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LockIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::toggle_lock(&state, &body.format_id, &body.question_id).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id))]
pub async fn http_post_shuffle(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LineupIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::shuffle_unlocked(&state, &body.format_id).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id))]
pub async fn http_post_reset(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LineupIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::reset_order(&state, &body.format_id).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id))]
pub async fn http_post_lineup(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LineupIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::save_lineup(&state, &body.format_id).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id, option_index = body.option_index))]
pub async fn http_post_option_label(
  State(state): State<Arc<AppState>>,
  Json(body): Json<OptionLabelIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::edit_option_label(
    &state,
    &body.format_id,
    &body.question_id,
    body.option_index,
    &body.label,
  )
  .await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id, option_index = body.option_index))]
pub async fn http_post_option_correct(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CorrectOptionIn>,
) -> AppResult<impl IntoResponse> {
  let workspace =
    logic::set_correct_option(&state, &body.format_id, &body.question_id, body.option_index)
      .await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id, keyword_index = body.keyword_index))]
pub async fn http_post_keyword(
  State(state): State<Arc<AppState>>,
  Json(body): Json<KeywordEditIn>,
) -> AppResult<impl IntoResponse> {
  let workspace = logic::edit_keyword(
    &state,
    &body.format_id,
    &body.question_id,
    body.keyword_index,
    &body.value,
  )
  .await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id))]
pub async fn http_post_keyword_add(
  State(state): State<Arc<AppState>>,
  Json(body): Json<KeywordAddIn>,
) -> AppResult<impl IntoResponse> {
  let workspace =
    logic::add_keyword(&state, &body.format_id, &body.question_id, &body.value).await?;
  Ok(Json(workspace))
}

#[instrument(level = "info", skip(state, body), fields(%body.format_id, %body.question_id, keyword_index = body.keyword_index))]
pub async fn http_post_keyword_remove(
  State(state): State<Arc<AppState>>,
  Json(body): Json<KeywordRemoveIn>,
) -> AppResult<impl IntoResponse> {
  let workspace =
    logic::remove_keyword(&state, &body.format_id, &body.question_id, body.keyword_index)
      .await?;
  Ok(Json(workspace))
}
