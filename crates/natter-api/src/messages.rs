use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use natter_types::api::SendMessageRequest;

use crate::{AppState, status_for};

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let message = state
        .controller
        .add_msg(&req.body, &req.author)
        .await
        .map_err(status_for)?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.controller.find_all_msgs().await.map_err(status_for)?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let message = state
        .controller
        .find_msg(message_id)
        .await
        .map_err(status_for)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    state
        .controller
        .delete_msg(message_id)
        .await
        .map_err(status_for)?;

    Ok(StatusCode::NO_CONTENT)
}
