//! Mock Quantum API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Quantum
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests,
//! enabling realistic workflow testing: login, project listing, statistics
//! and paginated post listings with `paging.next` cursors.
//!
//! # Example
//!
//! ```ignore
//! use quantumapi::mock_server::{Fixtures, MockServer};
//! use quantumapi::{Network, PostsQuery};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = server.client().unwrap();
//!
//!     // Server comes with default fixtures
//!     let posts = client
//!         .posts(Network::Facebook, Fixtures::PROJECT_ID, Fixtures::PROFILE_ID, &PostsQuery::default())
//!         .unwrap()
//!         .collect_all()
//!         .await
//!         .unwrap();
//!     assert_eq!(posts.len(), 3);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{Login, MockState, RecordedRequest, DEFAULT_PAGE_SIZE};
