//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Quantum API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// Default number of posts per page when the request has no `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Credentials accepted by the login endpoint.
#[derive(Debug, Clone)]
pub struct Login {
    pub secret: String,
    pub account_id: u64,
    pub token: String,
}

/// A request the server answered, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Path below the version segment (e.g. `/accounts/741/projects`).
    pub path: String,
    /// Decoded query parameters.
    pub query: BTreeMap<String, String>,
    /// The `X-Auth-Token` header, if sent.
    pub token: Option<String>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// The only account id the server knows. Any account is accepted when unset.
    pub account_id: Option<String>,

    /// Projects in listing order, each with an `_id` field.
    pub projects: Vec<Value>,

    /// Posts indexed by (network, profile id).
    pub posts: HashMap<(String, String), Vec<Value>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Credentials for `POST /login`. Login is rejected when unset.
    pub login: Option<Login>,

    /// Number of upcoming API requests answered with an internal server error.
    pub fail_next: u32,

    /// Emit `paging.next` as absolute URLs including the version segment.
    pub absolute_links: bool,

    /// Every API request received, in order.
    pub requests: Vec<RecordedRequest>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Restrict the server to one account.
    pub fn with_account(mut self, account_id: &str) -> Self {
        self.account_id = Some(account_id.to_string());
        self
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Value) -> Self {
        self.projects.push(project);
        self
    }

    /// Set the posts of a profile.
    pub fn with_posts(mut self, network: &str, profile_id: &str, posts: Vec<Value>) -> Self {
        self.posts
            .insert((network.to_string(), profile_id.to_string()), posts);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Accept logins with these credentials.
    pub fn with_login(mut self, login: Login) -> Self {
        self.login = Some(login);
        self
    }

    /// Answer the next `count` API requests with an internal server error.
    pub fn with_failures(mut self, count: u32) -> Self {
        self.fail_next = count;
        self
    }

    /// Emit absolute pagination links.
    pub fn with_absolute_links(mut self) -> Self {
        self.absolute_links = true;
        self
    }

    /// Whether the account id is served.
    pub fn knows_account(&self, account_id: &str) -> bool {
        self.account_id.as_deref().map_or(true, |a| a == account_id)
    }

    /// Get a project by id.
    pub fn get_project(&self, project_id: &str) -> Option<&Value> {
        self.projects.iter().find(|p| id_matches(&p["_id"], project_id))
    }

    /// Get the posts of a profile.
    pub fn get_posts(&self, network: &str, profile_id: &str) -> Option<&Vec<Value>> {
        self.posts
            .get(&(network.to_string(), profile_id.to_string()))
    }

    /// Profiles of a project on one network, derived from its brands.
    pub fn list_profiles(&self, project_id: &str, network: &str) -> Vec<String> {
        self.get_project(project_id)
            .and_then(|p| p["brands"].as_array())
            .map(|brands| {
                brands
                    .iter()
                    .filter(|b| b["source"]["network"] == network)
                    .filter_map(|b| b["source"]["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Consume one injected failure, if any are left.
    pub fn take_failure(&mut self) -> bool {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            true
        } else {
            false
        }
    }
}

fn id_matches(id: &Value, wanted: &str) -> bool {
    match id {
        Value::String(s) => s == wanted,
        other => other.to_string() == wanted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_add_and_get_project() {
        let state = MockState::new().with_project(Fixtures::minimal_project(4, "Test Project"));

        let project = state.get_project("4");
        assert!(project.is_some());
        assert_eq!(project.unwrap()["name"], "Test Project");
        assert!(state.get_project("5").is_none());
    }

    #[test]
    fn test_list_profiles_from_brands() {
        let state = MockState::new().with_project(Fixtures::project_with_brands(
            4,
            "Brands",
            &["111", "222"],
        ));

        assert_eq!(state.list_profiles("4", "facebook"), vec!["111", "222"]);
        assert!(state.list_profiles("4", "twitter").is_empty());
    }

    #[test]
    fn test_take_failure_counts_down() {
        let mut state = MockState::new().with_failures(2);
        assert!(state.take_failure());
        assert!(state.take_failure());
        assert!(!state.take_failure());
    }

    #[test]
    fn test_knows_account() {
        assert!(MockState::new().knows_account("anything"));
        let state = MockState::new().with_account("741");
        assert!(state.knows_account("741"));
        assert!(!state.knows_account("742"));
    }
}
