//! Quantum API CLI binary.
//!
//! A command-line interface for interacting with the Quantum analytics API.

use std::process::ExitCode;

use clap::Parser;
use quantumapi::cli::{Cli, Command, Metric};
use quantumapi::endpoints::{find_endpoint, CATALOG};
use quantumapi::{
    ClientConfig, Credentials, Params, PathArgs, PostsQuery, QuantumClient,
    QuantumError, StatQuery,
};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.command.needs_session() {
        return match list_endpoints(cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let client = match connect(cli.retries).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set QUANTUM_ACCOUNT_ID and QUANTUM_TOKEN, or QUANTUM_API_SECRET");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(retries: Option<u32>) -> quantumapi::Result<QuantumClient> {
    let credentials = Credentials::from_env()?;
    let mut config = ClientConfig::from_env()?;
    if let Some(retries) = retries {
        config = config.with_retries(retries);
    }
    QuantumClient::connect(credentials, config).await
}

async fn run(client: &QuantumClient, cli: Cli) -> quantumapi::Result<()> {
    match cli.command {
        Command::Projects => {
            let projects = client.projects().await?;
            if cli.json {
                output_json(&projects)?;
            } else {
                let rows: Vec<ProjectRow> = projects
                    .as_array()
                    .map(|items| items.iter().map(ProjectRow::from).collect())
                    .unwrap_or_default();
                println!("{}", Table::new(rows));
            }
        }
        Command::Project { project } => output_json(&client.project(project).await?)?,
        Command::Profiles { network, project } => {
            output_json(&client.profiles(network, project).await?)?
        }
        Command::Stats {
            metric,
            project,
            network,
            since,
            until,
            ids,
            timezone,
            owner,
            post_type,
        } => {
            let mut query = StatQuery::new(since, until).timezone(timezone);
            if !ids.is_empty() {
                query = query.ids(ids);
            }
            query.owner = owner;
            query.post_type = post_type;

            let result = match metric {
                Metric::Summary => client.stat_summary(network, project, &query).await?,
                Metric::Audience => client.audience_count_by_date(network, project, &query).await?,
                Metric::Interactions => {
                    client.interactions_count_by_date(network, project, &query).await?
                }
                Metric::PostsCount => client.posts_count_by_date(network, project, &query).await?,
                Metric::EngagementRate => {
                    client.engagement_rate_by_date(network, project, &query).await?
                }
                Metric::FansByCountry => client.facebook_fans_total_by_country(project, &query).await?,
                Metric::PostsInteractions => {
                    client.facebook_posts_interactions_by_date(project, &query).await?
                }
            };
            output_json(&result)?;
        }
        Command::Posts {
            network,
            project,
            profile,
            since,
            until,
            limit,
            max_pages,
        } => {
            let query = PostsQuery {
                since,
                until,
                limit,
                ..Default::default()
            };
            let mut posts = client.posts(network, project, profile, &query)?;
            if let Some(max_pages) = max_pages {
                posts = posts.with_max_pages(max_pages);
            }
            while let Some(page) = posts.next_page().await? {
                output_json(&page)?;
            }
        }
        Command::Call {
            endpoint,
            project,
            profile,
            network,
            params,
            all_pages,
        } => {
            let endpoint = find_endpoint(&endpoint).ok_or_else(|| {
                QuantumError::ConfigMissing(format!(
                    "unknown endpoint '{endpoint}', see 'quantum endpoints'"
                ))
            })?;
            let args = PathArgs {
                project,
                profile,
                network,
            };
            let params: Params = params.into_iter().collect();

            if all_pages {
                let mut pages = client.paginate(endpoint, &args, params)?;
                while let Some(page) = pages.next_page().await? {
                    output_json(&page)?;
                }
            } else {
                output_json(&client.call(endpoint, &args, params).await?)?;
            }
        }
        Command::Endpoints => list_endpoints(cli.json)?,
    }
    Ok(())
}

fn list_endpoints(json: bool) -> quantumapi::Result<()> {
    if json {
        let names: Vec<&str> = CATALOG.iter().map(|e| e.name).collect();
        output_json(&names)?;
    } else {
        let rows: Vec<EndpointRow> = CATALOG.iter().map(EndpointRow::from).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn output_json<T: Serialize + ?Sized>(item: &T) -> quantumapi::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    id: String,
    name: String,
    brands: usize,
}

impl From<&serde_json::Value> for ProjectRow {
    fn from(p: &serde_json::Value) -> Self {
        let text = |v: &serde_json::Value| v.as_str().map_or_else(|| v.to_string(), str::to_string);
        Self {
            id: text(&p["_id"]),
            name: text(&p["name"]),
            brands: p["brands"].as_array().map_or(0, Vec::len),
        }
    }
}

#[derive(Tabled)]
struct EndpointRow {
    name: &'static str,
    path: &'static str,
    params: String,
    paginated: bool,
}

impl From<&quantumapi::Endpoint> for EndpointRow {
    fn from(e: &quantumapi::Endpoint) -> Self {
        Self {
            name: e.name,
            path: e.template,
            params: e.params.join(", "),
            paginated: e.paginated,
        }
    }
}
