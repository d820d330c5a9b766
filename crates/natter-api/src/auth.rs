use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use natter_types::api::{LoginRequest, RegisterRequest};

use crate::{AppState, status_for};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .controller
        .register(&req.username)
        .await
        .map_err(status_for)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// No password: knowing a registered username is enough to open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .controller
        .login(&req.username)
        .await
        .map_err(status_for)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user))
}

pub async fn session(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .controller
        .is_logged_in(&username)
        .await
        .map_err(status_for)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(user))
}
