//! Quantum analytics API client library.
//!
//! A Rust library for the Socialmetrix Quantum REST API: social-media
//! metrics for Facebook, Twitter, Instagram and YouTube profiles. Payloads
//! are returned as decoded JSON ([`Envelope`]) without interpretation.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use quantumapi::{Network, PostsQuery, QuantumClient, StatQuery};
//!
//! #[tokio::main]
//! async fn main() -> quantumapi::Result<()> {
//!     // Create client from environment variables
//!     let client = QuantumClient::from_env().await?;
//!
//!     // List the account's projects
//!     let projects = client.projects().await?;
//!     println!("{projects:?}");
//!
//!     // Stat summary for some fan pages
//!     let since = NaiveDate::from_ymd_opt(2015, 1, 10).unwrap();
//!     let until = NaiveDate::from_ymd_opt(2015, 1, 11).unwrap();
//!     let query = StatQuery::new(since, until).ids(["165175370206522"]);
//!     let summary = client.stat_summary(Network::Facebook, 4, &query).await?;
//!     println!("{summary:?}");
//!
//!     // Walk a paginated post listing
//!     let mut posts = client.posts(Network::Facebook, 4, "165175370206522", &PostsQuery::default())?;
//!     while let Some(page) = posts.next_page().await? {
//!         println!("{}", page["data"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`QuantumClient::dispatch`] builds the URL, sends one GET per attempt
//!   and retries the whole operation on failure.
//! - [`ResponseClassifier`] decodes bodies (numbers kept exact) and turns
//!   the API's error bodies into [`QuantumError`] variants.
//! - [`Paginator`] follows `paging.next` links lazily, one page at a time.
//! - [`endpoints`] holds the endpoint catalog the typed methods use.
//!
//! # Configuration
//!
//! [`QuantumClient::from_env`] reads:
//!
//! - `QUANTUM_ACCOUNT_ID` + `QUANTUM_TOKEN`, or `QUANTUM_API_SECRET`
//! - `QUANTUM_API_URL` (optional) - Base URL (defaults to `https://api.quantum.socialmetrix.com`)
//! - `QUANTUM_API_VERSION` (optional) - Version segment (defaults to `v1`)
//! - `QUANTUM_TIMEOUT_SECS` (optional) - Per-request timeout (none by default)
//! - `QUANTUM_RETRIES` (optional) - Retries per request (defaults to 3)

mod classify;
mod client;
mod config;
mod envelope;
mod error;
mod pagination;
mod params;
mod retry;

pub mod cli;
pub mod endpoints;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use classify::{NumberMode, ResponseClassifier};
pub use client::QuantumClient;
pub use config::{ClientConfig, Credentials};
pub use envelope::Envelope;
pub use error::{QuantumError, Result};
pub use pagination::{PageSource, Paginator, MAX_PAGES};
pub use params::Params;
pub use retry::{RetryPolicy, DEFAULT_RETRIES};

// Re-export endpoint types
pub use endpoints::{Endpoint, Method, Network, PathArgs, PostsQuery, StatQuery};
