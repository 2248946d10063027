//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument};

use crate::error::AppResult;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage, WorkspaceOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "examforge_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "examforge_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "examforge_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "examforge_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListFormats => {
      let formats = state.list_formats().await;
      tracing::info!(target: "format", count = formats.len(), "WS formats listed");
      ServerWsMessage::Formats { formats }
    }

    ClientWsMessage::OpenWorkspace { format_id } => {
      let view = logic::workspace_view(state, &format_id).await;
      if let Ok(workspace) = &view {
        tracing::info!(
          target: "workspace",
          %format_id,
          questions = workspace.total_questions,
          clusters = workspace.clusters.len(),
          "WS workspace served"
        );
      }
      to_reply(view)
    }

    ClientWsMessage::EditPrompt { format_id, question_id, prompt } =>
      to_reply(logic::edit_prompt(state, &format_id, &question_id, &prompt).await),

    ClientWsMessage::ToggleLock { format_id, question_id } =>
      to_reply(logic::toggle_lock(state, &format_id, &question_id).await),

    ClientWsMessage::ShuffleUnlocked { format_id } =>
      to_reply(logic::shuffle_unlocked(state, &format_id).await),

    ClientWsMessage::ResetOrder { format_id } =>
      to_reply(logic::reset_order(state, &format_id).await),

    ClientWsMessage::SaveLineup { format_id } =>
      to_reply(logic::save_lineup(state, &format_id).await),

    ClientWsMessage::SetCorrectOption { format_id, question_id, option_index } =>
      to_reply(logic::set_correct_option(state, &format_id, &question_id, option_index).await),

    ClientWsMessage::EditOptionLabel { format_id, question_id, option_index, label } =>
      to_reply(logic::edit_option_label(state, &format_id, &question_id, option_index, &label).await),

    ClientWsMessage::EditKeyword { format_id, question_id, keyword_index, value } =>
      to_reply(logic::edit_keyword(state, &format_id, &question_id, keyword_index, &value).await),

    ClientWsMessage::AddKeyword { format_id, question_id, value } =>
      to_reply(logic::add_keyword(state, &format_id, &question_id, &value).await),

    ClientWsMessage::RemoveKeyword { format_id, question_id, keyword_index } =>
      to_reply(logic::remove_keyword(state, &format_id, &question_id, keyword_index).await),
  }
}

/// Wrap an operation result: workspace on success, error message otherwise.
fn to_reply(result: AppResult<WorkspaceOut>) -> ServerWsMessage {
  match result {
    Ok(workspace) => ServerWsMessage::Workspace { workspace },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}
