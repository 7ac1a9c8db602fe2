//! Web search example using the bingsearch client

use bingsearch::{utils::debug, QueryKeyword, SearchClient, SearchOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let client = match std::env::var("BING_APP_ID") {
        Ok(app_id) => SearchClient::new(&app_id)?,
        Err(_) => SearchClient::from_user_config()?,
    };

    if client.app_id().is_none() && client.user_app_id().is_none() {
        println!("⚠️ Bing application id not found. Set BING_APP_ID or write it to ~/.bing_app_id.");
        return Ok(());
    }

    println!("🔍 Searching for \"ruby\" on GitHub and RubyForge...");

    let options = SearchOptions::new()
        .filter(QueryKeyword::Site, vec!["github.com", "rubyforge.org"])
        .top(5)
        .debug(debug::debug_basic());
    let response = client.web("ruby", &options).await?;

    let results = response.web_results();
    println!("Found {} results:", results.len());
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}", i + 1, result.title);
        println!("   URL: {}", result.url);
        if let Some(snippet) = &result.snippet {
            println!("   {snippet}");
        }
        println!();
    }

    // Fields are reachable through their snake_case names
    if let Some(next) = response.get("next").and_then(|v| v.as_str()) {
        println!("Next page: {next}");
    }

    Ok(())
}
