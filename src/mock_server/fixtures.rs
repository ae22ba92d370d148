//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic Quantum API payloads.

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::state::{Login, MockState};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The default account, token and data set served by the mock server.
pub struct DefaultScenario {
    pub account_id: String,
    pub token: String,
    pub login: Login,
    pub projects: Vec<Value>,
    pub posts: Vec<(String, String, Vec<Value>)>,
}

impl Fixtures {
    pub const ACCOUNT_ID: &'static str = "741";
    pub const TOKEN: &'static str = "test-token";
    pub const SECRET: &'static str = "test-secret";
    pub const PROJECT_ID: &'static str = "4";
    pub const PROFILE_ID: &'static str = "165175370206522";

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// A project without brands.
    pub fn minimal_project(id: u64, name: &str) -> Value {
        json!({
            "_id": id,
            "name": name,
            "brands": []
        })
    }

    /// A project with one Facebook brand per profile id.
    pub fn project_with_brands(id: u64, name: &str, profile_ids: &[&str]) -> Value {
        let brands: Vec<Value> = profile_ids
            .iter()
            .enumerate()
            .map(|(i, profile)| {
                json!({
                    "id": i + 1,
                    "name": format!("Brand {}", i + 1),
                    "source": { "id": profile, "network": "facebook" }
                })
            })
            .collect();

        json!({
            "_id": id,
            "name": name,
            "brands": brands
        })
    }

    // =========================================================================
    // Profile Fixtures
    // =========================================================================

    /// A profile record as listed under a project.
    pub fn profile(network: &str, id: &str) -> Value {
        json!({
            "id": id,
            "network": network,
            "name": format!("{network} profile {id}")
        })
    }

    // =========================================================================
    // Post Fixtures
    // =========================================================================

    /// `count` posts of a profile, newest first.
    pub fn posts(profile_id: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "id": format!("{profile_id}_{}", count - i),
                    "message": format!("Post number {}", count - i),
                    "type": if i % 2 == 0 { "photo" } else { "link" },
                    "interactions": 10 * (count - i)
                })
            })
            .collect()
    }

    // =========================================================================
    // Statistic Fixtures
    // =========================================================================

    /// One data point per day of `since..=until`.
    pub fn daily_series(since: NaiveDate, until: NaiveDate) -> Value {
        let data: Vec<Value> = since
            .iter_days()
            .take_while(|day| *day <= until)
            .enumerate()
            .map(|(i, day)| json!({ "date": day.to_string(), "value": 1000 + i * 7 }))
            .collect();
        json!({ "data": data })
    }

    /// A stat summary carrying high-precision decimal metrics.
    pub fn stat_summary() -> Value {
        // Parsed from text so the digits survive exactly.
        serde_json::from_str(
            r#"{
                "data": {
                    "fans": 152340,
                    "engagementRate": 12.345678901234,
                    "interactionRate": 0.10000000000000000000001
                }
            }"#,
        )
        .expect("stat summary fixture is valid JSON")
    }

    /// Fans per country.
    pub fn fans_by_country() -> Value {
        json!({
            "data": [
                { "country": "AR", "value": 84211 },
                { "country": "BR", "value": 40120 },
                { "country": "US", "value": 28009 }
            ]
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// The default data set: one account with two projects and a profile
    /// with 25 posts.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            account_id: Self::ACCOUNT_ID.to_string(),
            token: Self::TOKEN.to_string(),
            login: Login {
                secret: Self::SECRET.to_string(),
                account_id: 741,
                token: Self::TOKEN.to_string(),
            },
            projects: vec![
                Self::project_with_brands(4, "Test Project", &[Self::PROFILE_ID]),
                Self::minimal_project(5, "Empty Project"),
            ],
            posts: vec![(
                "facebook".to_string(),
                Self::PROFILE_ID.to_string(),
                Self::posts(Self::PROFILE_ID, 25),
            )],
        }
    }

    /// State built from the default scenario.
    pub fn default_state() -> MockState {
        let scenario = Self::default_scenario();
        let mut state = MockState::new()
            .with_account(&scenario.account_id)
            .with_required_token(&scenario.token)
            .with_login(scenario.login);

        for project in scenario.projects {
            state = state.with_project(project);
        }
        for (network, profile, posts) in scenario.posts {
            state = state.with_posts(&network, &profile, posts);
        }
        state
    }
}
