//! Basic example demonstrating the Quantum API client.
//!
//! Run with:
//! ```
//! QUANTUM_API_SECRET=your-secret cargo run --example basic
//! ```

use chrono::{Duration, Utc};
use quantumapi::{Network, PostsQuery, QuantumClient, StatQuery};

#[tokio::main]
async fn main() -> quantumapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Quantum client...");
    let client = QuantumClient::from_env().await?;
    println!("Connected to: {} (account {})", client.api_root(), client.account_id());

    // List projects
    println!("\n--- Listing Projects ---");
    let projects = client.projects().await?;
    let projects = projects.as_array().cloned().unwrap_or_default();
    println!("Found {} projects", projects.len());

    for project in &projects {
        println!("  - {} ({})", project["name"], project["_id"]);
    }

    let Some(first_project) = projects.first() else {
        return Ok(());
    };
    let project_id = match &first_project["_id"] {
        serde_json::Value::String(id) => id.clone(),
        other => other.to_string(),
    };

    // Facebook profiles of the first project
    println!("\n--- Facebook Profiles ---");
    let profiles = client.profiles(Network::Facebook, &project_id).await?;
    println!("{}", serde_json::to_string_pretty(&profiles)?);

    // Last week's summary for every profile in the project
    let until = Utc::now().date_naive();
    let since = until - Duration::days(7);
    let query = StatQuery::new(since, until);

    println!("\n--- Stat Summary ({since} to {until}) ---");
    let summary = client
        .stat_summary(Network::Facebook, &project_id, &query)
        .await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(rate) = summary.decimal("/data/engagementRate") {
        println!("Engagement rate: {rate}");
    }

    // Walk the posts of the first profile, a few pages at most
    let first_profile = profiles["data"][0]["id"].as_str().map(str::to_string);
    if let Some(profile_id) = first_profile {
        println!("\n--- Posts of {profile_id} ---");
        let query = PostsQuery {
            since: Some(since),
            until: Some(until),
            limit: Some(20),
            ..Default::default()
        };
        let mut posts = client
            .posts(Network::Facebook, &project_id, &profile_id, &query)?
            .with_max_pages(3);

        while let Some(page) = posts.next_page().await? {
            let count = page["data"].as_array().map_or(0, Vec::len);
            println!("  page {}: {count} posts", posts.pages_fetched());
        }
    }

    println!("\nDone!");
    Ok(())
}
