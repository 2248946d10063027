//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Every workspace operation follows the same shape: mutate the lineup
//! through `AppState`, rerun the lineup review over the fresh snapshot, and
//! return the assembled workspace DTO. The review itself is pure and
//! recomputed in full; no diagnostics survive between calls.

use tracing::{info, instrument};

use crate::domain::{FormatBlueprint, Question};
use crate::error::{AppError, AppResult};
use crate::protocol::{to_workspace_out, WorkspaceOut};
use crate::review::compute_diagnostics_with;
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Open (or re-read) the workspace for a format and run a review pass.
#[instrument(level = "info", skip(state), fields(%format_id))]
pub async fn workspace_view(state: &AppState, format_id: &str) -> AppResult<WorkspaceOut> {
  let questions = state.open_workspace(format_id).await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state, prompt), fields(%format_id, %question_id, prompt_len = prompt.len()))]
pub async fn edit_prompt(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  prompt: &str,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      ws.question_mut(question_id)?.prompt = prompt.to_string();
      Ok(())
    })
    .await?;
  info!(target: "workspace", %format_id, %question_id, prompt = %trunc_for_log(prompt, 80), "Prompt edited");
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id, %question_id))]
pub async fn toggle_lock(
  state: &AppState,
  format_id: &str,
  question_id: &str,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      question.locked = !question.locked;
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id))]
pub async fn shuffle_unlocked(state: &AppState, format_id: &str) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      ws.shuffle_unlocked();
      Ok(())
    })
    .await?;
  info!(target: "workspace", %format_id, "Lineup shuffled (locked positions kept)");
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id))]
pub async fn reset_order(state: &AppState, format_id: &str) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      ws.reset_order();
      Ok(())
    })
    .await?;
  info!(target: "workspace", %format_id, "Lineup reset to baseline");
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id))]
pub async fn save_lineup(state: &AppState, format_id: &str) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      ws.save_lineup();
      Ok(())
    })
    .await?;
  info!(target: "workspace", %format_id, "Lineup saved as baseline");
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id, %question_id, option_index))]
pub async fn set_correct_option(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  option_index: usize,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      let label = {
        let options = question
          .options
          .as_mut()
          .ok_or_else(|| AppError::BadRequest("question has no options".to_string()))?;
        if option_index >= options.len() {
          return Err(AppError::BadRequest(format!(
            "option index {option_index} out of range"
          )));
        }
        for (idx, option) in options.iter_mut().enumerate() {
          option.correct = idx == option_index;
        }
        options[option_index].label.clone()
      };
      question.answer = Some(label);
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state, label), fields(%format_id, %question_id, option_index))]
pub async fn edit_option_label(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  option_index: usize,
  label: &str,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      let options = question
        .options
        .as_mut()
        .ok_or_else(|| AppError::BadRequest("question has no options".to_string()))?;
      let option = options.get_mut(option_index).ok_or_else(|| {
        AppError::BadRequest(format!("option index {option_index} out of range"))
      })?;
      let was_correct = option.correct;
      option.label = label.to_string();
      if was_correct {
        question.answer = Some(label.to_string());
      }
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state, value), fields(%format_id, %question_id, keyword_index))]
pub async fn edit_keyword(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  keyword_index: usize,
  value: &str,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      let keywords = question
        .keywords
        .as_mut()
        .ok_or_else(|| AppError::BadRequest("question has no keywords".to_string()))?;
      let slot = keywords.get_mut(keyword_index).ok_or_else(|| {
        AppError::BadRequest(format!("keyword index {keyword_index} out of range"))
      })?;
      *slot = value.to_string();
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state, value), fields(%format_id, %question_id))]
pub async fn add_keyword(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  value: &str,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      question
        .keywords
        .get_or_insert_with(Vec::new)
        .push(value.to_string());
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

#[instrument(level = "info", skip(state), fields(%format_id, %question_id, keyword_index))]
pub async fn remove_keyword(
  state: &AppState,
  format_id: &str,
  question_id: &str,
  keyword_index: usize,
) -> AppResult<WorkspaceOut> {
  let questions = state
    .update_workspace(format_id, |ws| {
      let question = ws.question_mut(question_id)?;
      let keywords = question
        .keywords
        .as_mut()
        .ok_or_else(|| AppError::BadRequest("question has no keywords".to_string()))?;
      if keyword_index >= keywords.len() {
        return Err(AppError::BadRequest(format!(
          "keyword index {keyword_index} out of range"
        )));
      }
      keywords.remove(keyword_index);
      Ok(())
    })
    .await?;
  render(state, format_id, questions).await
}

async fn render(
  state: &AppState,
  format_id: &str,
  questions: Vec<Question>,
) -> AppResult<WorkspaceOut> {
  let format = require_format(state, format_id).await?;
  let report = compute_diagnostics_with(&questions, &state.review);
  Ok(to_workspace_out(format, &questions, &report))
}

async fn require_format(state: &AppState, format_id: &str) -> AppResult<FormatBlueprint> {
  state
    .get_format(format_id)
    .await
    .ok_or_else(|| AppError::UnknownFormat(format_id.to_string()))
}
