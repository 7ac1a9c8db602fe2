//! bingsearch CLI - Command-line interface for the bingsearch client
//!
//! Runs Bing web searches from the terminal, with keyword filters,
//! pagination and raw JSON output.

use anyhow::{anyhow, Context};
use bingsearch::{
    config::{self, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS},
    troubleshooting_info,
    types::{FilterValue, QueryKeyword, SearchOptions, Source},
    utils::{debug, http::normalize_text},
    ClientConfig, ResponseData, SearchClient, SearchError,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::collections::BTreeMap;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bingsearch")]
#[command(about = "Bing web search CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the web
    Web {
        /// Search query
        query: String,

        /// Bing application id (falls back to ~/.bing_app_id)
        #[arg(long, env = "BING_APP_ID", hide_env_values = true)]
        app_id: Option<String>,

        /// API base URL
        #[arg(long, env = "BING_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Restrict results to a site (repeat to match any of several sites)
        #[arg(short, long)]
        site: Vec<String>,

        /// Keyword filter as keyword=value, e.g. filetype=pdf (repeatable)
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(QueryKeyword, String)>,

        /// Number of results to return
        #[arg(short, long)]
        top: Option<u32>,

        /// Number of results to skip
        #[arg(long)]
        skip: Option<u32>,

        /// Extra API parameter as name=value, e.g. Market=en-US (repeatable)
        #[arg(short, long, value_parser = parse_param)]
        param: Vec<(String, String)>,

        /// Request timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout: u64,

        /// Enable debug output
        #[arg(short, long)]
        debug: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List search sources and query keywords
    Sources,
    /// Show where the application id comes from
    Config {
        /// Bing application id
        #[arg(long, env = "BING_APP_ID", hide_env_values = true)]
        app_id: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Simple,
}

fn parse_filter(raw: &str) -> Result<(QueryKeyword, String), String> {
    let (keyword, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected keyword=value, got '{raw}'"))?;
    let keyword = keyword.parse::<QueryKeyword>().map_err(|e| e.to_string())?;
    Ok((keyword, value.to_string()))
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("parameter name missing in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Group repeated keywords: one value stays verbatim, several are OR-joined
fn collect_filters(
    site: Vec<String>,
    filter: Vec<(QueryKeyword, String)>,
) -> BTreeMap<QueryKeyword, FilterValue> {
    let mut grouped: BTreeMap<QueryKeyword, Vec<String>> = BTreeMap::new();
    for value in site {
        grouped.entry(QueryKeyword::Site).or_default().push(value);
    }
    for (keyword, value) in filter {
        grouped.entry(keyword).or_default().push(value);
    }

    grouped
        .into_iter()
        .map(|(keyword, mut values)| {
            let value = if values.len() == 1 {
                FilterValue::One(values.remove(0))
            } else {
                FilterValue::AnyOf(values)
            };
            (keyword, value)
        })
        .collect()
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Web {
            query,
            app_id,
            base_url,
            site,
            filter,
            top,
            skip,
            param,
            timeout,
            debug,
            format,
        } => {
            let options = SearchOptions {
                filters: collect_filters(site, filter),
                top,
                skip,
                params: param.into_iter().collect(),
                debug: debug.then(debug::debug_all),
                ..Default::default()
            };
            handle_web_search(query, app_id, base_url, timeout, options, format).await
        }
        Commands::Sources => {
            handle_list_sources();
            Ok(())
        }
        Commands::Config { app_id } => handle_config(app_id),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "Error:".bold().red());
            if let Some(search_error) = error.downcast_ref::<SearchError>() {
                eprintln!(
                    "{} {}",
                    "Troubleshooting:".bold(),
                    troubleshooting_info(search_error)
                );
            }
            ExitCode::FAILURE
        }
    }
}

async fn handle_web_search(
    query: String,
    app_id: Option<String>,
    base_url: String,
    timeout: u64,
    options: SearchOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = SearchClient::with_config(ClientConfig {
        app_id: app_id.filter(|id| !id.trim().is_empty()),
        base_url,
        timeout_ms: timeout,
        ..Default::default()
    })?;

    let response = client.web(&query, &options).await?;
    display_response(&response, &format)
}

fn handle_list_sources() {
    println!("{}", "Search Sources:".bold().blue());
    for source in Source::ALL {
        println!("  {} (bingsearch {})", source.as_str().bold(), source.method_name());
    }

    println!();
    println!("{}", "Query Keywords (use --filter keyword=value):".bold().blue());
    let keywords = QueryKeyword::ALL
        .iter()
        .map(|kw| kw.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!("  {keywords}");
}

fn handle_config(app_id: Option<String>) -> anyhow::Result<()> {
    println!("{}", "Bing application id:".bold().blue());

    if let Some(app_id) = app_id.filter(|id| !id.trim().is_empty()) {
        println!("{} from --app-id / BING_APP_ID ({})", "✅".green(), mask(&app_id));
        return Ok(());
    }

    let path = config::user_app_id_path()
        .ok_or_else(|| anyhow!("could not determine the home directory"))?;
    match config::read_app_id_file(&path)
        .with_context(|| format!("failed to read {}", path.display()))?
    {
        Some(app_id) => {
            println!("{} from {} ({})", "✅".green(), path.display(), mask(&app_id));
            Ok(())
        }
        None => {
            println!("{} not configured", "❌".red());
            println!();
            println!("{}", "Configure it with one of:".bold());
            println!("export BING_APP_ID=your_app_id");
            println!("echo your_app_id > {}", path.display());
            Err(anyhow!("no application id configured"))
        }
    }
}

fn mask(app_id: &str) -> String {
    let visible: String = app_id.chars().take(4).collect();
    format!("{visible}***")
}

fn display_response(response: &ResponseData, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
        OutputFormat::Simple => {
            for (i, result) in response.web_results().iter().enumerate() {
                println!("{}. {}", i + 1, result.title);
                println!("   {}", result.url);
                if let Some(snippet) = &result.snippet {
                    println!("   {}", normalize_text(snippet));
                }
                println!();
            }
        }
        OutputFormat::Table => {
            let results = response.web_results();
            println!("{}", "Search Results".bold().blue());
            println!("{}", "─".repeat(80).dimmed());

            for (i, result) in results.iter().enumerate() {
                println!("{}. {}", (i + 1).to_string().bold(), result.title.bold());
                println!("   🔗 {}", result.url.blue().underline());

                if let Some(display_url) = &result.display_url {
                    println!("   🌐 {}", display_url.green());
                }

                if let Some(snippet) = &result.snippet {
                    let snippet = normalize_text(snippet);
                    let truncated = if snippet.chars().count() > 200 {
                        format!("{}...", snippet.chars().take(200).collect::<String>())
                    } else {
                        snippet
                    };
                    println!("   📄 {}", truncated.italic());
                }

                println!();
            }

            println!("{} {}", "Total results:".bold(), results.len().to_string().bold());
        }
    }

    Ok(())
}
