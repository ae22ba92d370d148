//! Profile, statistic and post handlers.
//!
//! Everything below `/accounts/{account}/projects/{project}/` is served by
//! one catch-all route and dispatched on the remaining path segments.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::HOST, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{admit, bad_request, handler_not_found, not_found, query_map};
use crate::endpoints::Network;
use crate::mock_server::fixtures::Fixtures;
use crate::mock_server::state::{MockState, DEFAULT_PAGE_SIZE};

/// GET /accounts/{account}/projects/{project}/*rest
pub async fn project_resource(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((account, project, rest)): Path<(String, String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = admit(&state, &account, &uri, &headers).await {
        return rejection;
    }

    let state = state.read().await;
    if state.get_project(&project).is_none() {
        return not_found(format!("No project with id {project}"));
    }

    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let Some((network, tail)) = segments.split_first() else {
        return handler_not_found(uri).await.into_response();
    };
    let Ok(network) = network.parse::<Network>() else {
        return handler_not_found(uri).await.into_response();
    };
    let query = query_map(&uri);

    match tail {
        ["profiles"] => {
            let profiles: Vec<Value> = state
                .list_profiles(&project, network.as_str())
                .iter()
                .map(|id| Fixtures::profile(network.as_str(), id))
                .collect();
            Json(json!({ "data": profiles })).into_response()
        }
        ["profiles", "stat-summary"] => Json(Fixtures::stat_summary()).into_response(),
        ["profiles", "interactions", "count", "date"]
        | ["profiles", "posts", "count", "date"]
        | ["profiles", "engagement-rate", "date"] => daily_series(&query),
        ["profiles", "posts-interactions", "count", "date"] if network == Network::Facebook => {
            daily_series(&query)
        }
        ["fans", "total", "country"] if network == Network::Facebook => {
            Json(Fixtures::fans_by_country()).into_response()
        }
        [audience, "count", "date"] if *audience == network.audience() => daily_series(&query),
        ["profiles", profile] => {
            if state.list_profiles(&project, network.as_str()).iter().any(|p| p == profile) {
                Json(Fixtures::profile(network.as_str(), profile)).into_response()
            } else {
                not_found(format!("No {network} profile with id {profile}"))
            }
        }
        ["profiles", profile, "posts"] => match state.get_posts(network.as_str(), profile) {
            Some(posts) => posts_page(&state, posts, &uri, &headers, query),
            None => not_found(format!("No posts for {network} profile {profile}")),
        },
        _ => handler_not_found(uri).await.into_response(),
    }
}

fn daily_series(query: &BTreeMap<String, String>) -> Response {
    let date = |name: &str| -> Result<NaiveDate, Response> {
        let value = query
            .get(name)
            .ok_or_else(|| bad_request(format!("Missing parameter: {name}")))?;
        value
            .parse()
            .map_err(|_| bad_request(format!("Invalid date for {name}: {value}")))
    };

    match (date("since"), date("until")) {
        (Ok(since), Ok(until)) => Json(Fixtures::daily_series(since, until)).into_response(),
        (Err(rejection), _) | (_, Err(rejection)) => rejection,
    }
}

/// One page of posts, with a `paging.next` link while more remain.
fn posts_page(
    state: &MockState,
    posts: &[Value],
    uri: &Uri,
    headers: &HeaderMap,
    mut query: BTreeMap<String, String>,
) -> Response {
    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let limit: usize = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let start = (page - 1).saturating_mul(limit).min(posts.len());
    let end = start.saturating_add(limit).min(posts.len());
    let mut body = json!({ "data": &posts[start..end] });

    if end < posts.len() {
        query.insert("page".to_string(), (page + 1).to_string());
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&query)
            .finish();

        let next = if state.absolute_links {
            let host = headers
                .get(HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}/v1{}?{encoded}", uri.path())
        } else {
            format!("{}?{encoded}", uri.path())
        };
        body["paging"] = json!({ "next": next });
    }

    (StatusCode::OK, Json(body)).into_response()
}
