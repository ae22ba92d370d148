//! Pagination tests against a mocked Quantum API.

use chrono::NaiveDate;
use futures::TryStreamExt;
use quantumapi::{ClientConfig, Network, PostsQuery, QuantumClient, QuantumError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POSTS_PATH: &str = "/v1/accounts/1/projects/2/facebook/profiles/3/posts";
const NEXT: &str = "/accounts/1/projects/2/facebook/profiles/3/posts?since=2015-01-01&page=2";

fn client(server: &MockServer, retries: u32) -> QuantumClient {
    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_retries(retries);
    QuantumClient::with_config(1, "test-token", config).unwrap()
}

fn since_query() -> PostsQuery {
    PostsQuery {
        since: NaiveDate::from_ymd_opt(2015, 1, 1),
        ..Default::default()
    }
}

async fn mount_two_pages(server: &MockServer, next: &str) {
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "3_2" }],
            "paging": { "next": next }
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("page", "2"))
        .and(query_param("since", "2015-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "3_1" }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_pages_in_order_then_end() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server, NEXT).await;

    let client = client(&mock_server, 0);
    let mut posts = client.posts(Network::Facebook, 2, 3, &since_query()).unwrap();

    let first = posts.next_page().await.unwrap().unwrap();
    assert_eq!(first["data"][0]["id"], "3_2");

    let second = posts.next_page().await.unwrap().unwrap();
    assert_eq!(second["data"][0]["id"], "3_1");

    assert!(posts.next_page().await.unwrap().is_none());
    assert!(!posts.has_next());
    assert_eq!(posts.pages_fetched(), 2);
}

#[tokio::test]
async fn test_absolute_cursor_with_version_prefix() {
    let mock_server = MockServer::start().await;
    let next = format!("{}{POSTS_PATH}?since=2015-01-01&page=2", mock_server.uri());
    mount_two_pages(&mock_server, &next).await;

    let client = client(&mock_server, 0);
    let pages = client
        .posts(Network::Facebook, 2, 3, &since_query())
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_stream_yields_every_page() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server, NEXT).await;

    let client = client(&mock_server, 0);
    let ids: Vec<String> = client
        .posts(Network::Facebook, 2, 3, &since_query())
        .unwrap()
        .into_stream()
        .map_ok(|page| page["data"][0]["id"].as_str().unwrap_or_default().to_string())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids, vec!["3_2", "3_1"]);
}

#[tokio::test]
async fn test_each_page_gets_its_own_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "paging": { "next": NEXT }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 2 fails once; a single retry covers it without refetching page 1.
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Internal server error" })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 1);
    let pages = client
        .posts(Network::Facebook, 2, 3, &since_query())
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_failed_page_ends_the_sequence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Handler not found: posts" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    let mut posts = client
        .posts(Network::Facebook, 2, 3, &PostsQuery::default())
        .unwrap();

    let result = posts.next_page().await;
    assert!(matches!(result, Err(QuantumError::HandlerNotFound(_))));
    assert!(posts.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_nothing_is_fetched_until_polled() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    let posts = client
        .posts(Network::Facebook, 2, 3, &PostsQuery::default())
        .unwrap();
    assert!(posts.has_next());
    drop(posts);
}

#[tokio::test]
async fn test_array_page_ends_the_sequence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "3_1" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    let pages = client
        .posts(Network::Facebook, 2, 3, &PostsQuery::default())
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_array());
}
