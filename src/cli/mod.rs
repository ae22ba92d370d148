//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the quantum binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::endpoints::Network;

/// Quantum analytics API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "quantum", about = "Quantum analytics API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Retries per request (overrides QUANTUM_RETRIES).
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the account's projects.
    Projects,

    /// Show one project.
    Project {
        /// Project id.
        project: String,
    },

    /// List a project's profiles on a network.
    Profiles {
        /// Social network.
        network: Network,

        /// Project id.
        project: String,
    },

    /// Fetch a statistic for a project's profiles.
    Stats {
        /// Which statistic to fetch.
        metric: Metric,

        /// Project id.
        project: String,

        /// Social network.
        #[arg(long, default_value = "facebook")]
        network: Network,

        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        since: NaiveDate,

        /// Last day of the range (YYYY-MM-DD).
        #[arg(long)]
        until: NaiveDate,

        /// Profile ids, comma separated.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,

        /// Timezone for day boundaries.
        #[arg(long, default_value = "UTC")]
        timezone: String,

        /// Post owner filter (posts-count only).
        #[arg(long)]
        owner: Option<String>,

        /// Post type filter (posts-count only).
        #[arg(long = "type")]
        post_type: Option<String>,
    },

    /// Walk a profile's posts page by page.
    Posts {
        /// Social network.
        network: Network,

        /// Project id.
        project: String,

        /// Profile id.
        profile: String,

        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD).
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Page size requested from the server.
        #[arg(long)]
        limit: Option<u32>,

        /// Stop after this many pages.
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Call any catalogued endpoint by name.
    Call {
        /// Endpoint name (see `quantum endpoints`).
        endpoint: String,

        /// Project id.
        #[arg(long)]
        project: Option<String>,

        /// Profile id.
        #[arg(long)]
        profile: Option<String>,

        /// Social network.
        #[arg(long)]
        network: Option<Network>,

        /// Query parameter as name=value; repeatable.
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Follow pagination links and print every page.
        #[arg(long)]
        all_pages: bool,
    },

    /// List the endpoint catalog.
    Endpoints,
}

impl Command {
    /// Whether the command talks to the API. Listing the static endpoint
    /// catalog works without credentials.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Endpoints)
    }
}

/// Statistics available through `quantum stats`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Summary statistics.
    Summary,
    /// Fans, followers or subscribers per day.
    Audience,
    /// Interactions per day.
    Interactions,
    /// Posts per day.
    PostsCount,
    /// Engagement rate per day.
    EngagementRate,
    /// Facebook fans per country.
    FansByCountry,
    /// Facebook post interactions per day.
    PostsInteractions,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}
