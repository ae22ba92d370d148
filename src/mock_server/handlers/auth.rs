//! Login handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use super::authentication_error;
use crate::mock_server::state::MockState;

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub method: String,
    pub secret: String,
}

/// POST /login
pub async fn login(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(body): Json<LoginBody>,
) -> impl IntoResponse {
    let state = state.read().await;

    match &state.login {
        Some(login) if body.method == "API-SECRET" && body.secret == login.secret => (
            StatusCode::OK,
            Json(json!({ "token": login.token, "accountId": login.account_id })),
        )
            .into_response(),
        _ => authentication_error("Invalid API secret"),
    }
}
