pub mod auth;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tracing::error;

use natter_db::{Controller, ControllerError};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub controller: Controller,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(auth::register))
        .route("/users/{username}/session", get(auth::session))
        .route("/auth/login", post(auth::login))
        .route("/messages", get(messages::list_messages).post(messages::send_message))
        .route(
            "/messages/{message_id}",
            get(messages::get_message).delete(messages::delete_message),
        )
        .with_state(state)
}

/// Maps a controller failure to a status code. Store errors are logged here
/// and never echoed back to the client.
pub(crate) fn status_for(err: ControllerError) -> StatusCode {
    match err {
        ControllerError::Validation(_) => StatusCode::BAD_REQUEST,
        ControllerError::UsernameTaken(_) => StatusCode::CONFLICT,
        ControllerError::Persistence(e) => {
            error!("persistence failure: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use natter_db::DbConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app() -> Router {
        let controller = Controller::create(&DbConfig::in_memory()).await.unwrap();
        router(Arc::new(AppStateInner { controller }))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn register_login_and_check_session() {
        let app = app().await;

        let (status, user) = call(&app, Method::POST, "/users", Some(json!({ "username": "alice" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["username"], "alice");
        assert!(user["logged_in_until"].is_null());

        let (status, _) = call(&app, Method::GET, "/users/alice/session", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, user) = call(&app, Method::POST, "/auth/login", Some(json!({ "username": "alice" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(user["logged_in_until"].is_string());

        let (status, _) = call(&app, Method::GET, "/users/alice/session", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_error_statuses() {
        let app = app().await;
        call(&app, Method::POST, "/users", Some(json!({ "username": "bob" }))).await;

        let (status, _) = call(&app, Method::POST, "/users", Some(json!({ "username": "bob" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, Method::POST, "/auth/login", Some(json!({ "username": "nobody" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::POST, "/auth/login", Some(json!({ "username": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn message_routes() {
        let app = app().await;
        let (_, alice) = call(&app, Method::POST, "/users", Some(json!({ "username": "alice" }))).await;

        let (status, list) = call(&app, Method::GET, "/messages", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));

        let (status, msg) = call(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "body": "hello", "author": alice })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = msg["id"].as_i64().unwrap();

        let (status, found) = call(&app, Method::GET, &format!("/messages/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["body"], "hello");
        assert_eq!(found["author"]["username"], "alice");

        let (status, _) = call(&app, Method::DELETE, &format!("/messages/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, &format!("/messages/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn message_validation_is_a_bad_request() {
        let app = app().await;
        let (_, alice) = call(&app, Method::POST, "/users", Some(json!({ "username": "alice" }))).await;

        let (status, _) = call(&app, Method::GET, "/messages/-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/messages",
            Some(json!({ "body": "", "author": alice })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
