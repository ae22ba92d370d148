//! HTTP request handlers for the mock server.
//!
//! Responses follow the Quantum API conventions: data bodies on success,
//! `{"code": ..., "message": ...}` bodies on failure.

pub mod analytics;
pub mod auth;
pub mod projects;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::{MockState, RecordedRequest};

pub use analytics::*;
pub use auth::*;
pub use projects::*;

const AUTH_HEADER: &str = "x-auth-token";

/// Record the request and run the checks every API route shares:
/// injected failures, the auth token and the account id.
pub(crate) async fn admit(
    state: &Arc<RwLock<MockState>>,
    account: &str,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<(), Response> {
    let token = headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = state.write().await;
    state.requests.push(RecordedRequest {
        path: uri.path().to_string(),
        query: query_map(uri),
        token: token.clone(),
    });

    if state.take_failure() {
        return Err(internal_error());
    }

    if let Some(required) = &state.required_token {
        if token.as_deref() != Some(required.as_str()) {
            return Err(authentication_error("Invalid or missing token"));
        }
    }

    if !state.knows_account(account) {
        return Err(authentication_error(&format!(
            "Token is not valid for account {account}"
        )));
    }

    Ok(())
}

/// Decode the query string of a request.
pub(crate) fn query_map(uri: &Uri) -> BTreeMap<String, String> {
    uri.query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

pub(crate) fn authentication_error(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": "authentication", "message": message })),
    )
        .into_response()
}

pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal server error" })),
    )
        .into_response()
}

pub(crate) fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": "not_found", "message": message })),
    )
        .into_response()
}

pub(crate) fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "code": "invalid_parameter", "message": message })),
    )
        .into_response()
}

/// Fallback for paths no route matches.
pub async fn handler_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Handler not found: {}", uri.path()) })),
    )
}
