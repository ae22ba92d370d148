//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{admit, not_found};
use crate::mock_server::state::MockState;

/// GET /accounts/{account}/projects
pub async fn list_projects(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(account): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(rejection) = admit(&state, &account, &uri, &headers).await {
        return rejection;
    }

    let state = state.read().await;
    (StatusCode::OK, Json(state.projects.clone())).into_response()
}

/// GET /accounts/{account}/projects/{project}
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((account, project)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(rejection) = admit(&state, &account, &uri, &headers).await {
        return rejection;
    }

    let state = state.read().await;
    match state.get_project(&project) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found(format!("No project with id {project}")),
    }
}
