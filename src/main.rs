use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use articlefinder::fetcher::HttpFetcher;
use articlefinder::result_view::{self, SortKey, SortOrder};
use articlefinder::{AppConfig, Finder, SearchRequest, SearchResult, ShopRegistry};

/// Search several online shops at once and compare prices.
#[derive(Parser, Debug)]
#[command(name = "articlefinder", version)]
struct Cli {
    /// What to search for
    #[arg(required_unless_present = "list_shops")]
    term: Option<String>,

    /// Only search this shop (repeatable)
    #[arg(short, long = "shop")]
    shops: Vec<String>,

    /// price, name, article-number or shop
    #[arg(long, default_value = "price")]
    sort: SortKey,

    #[arg(long)]
    descending: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// List the available shops and exit
    #[arg(long)]
    list_shops: bool,

    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("articlefinder=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config_dir)?;
    let registry = ShopRegistry::with_default_shops();

    if cli.list_shops {
        for name in registry.list_shops() {
            println!("{}", name);
        }
        return Ok(());
    }

    let enabled = if cli.shops.is_empty() {
        config.shops.enabled.clone()
    } else {
        cli.shops.clone()
    };
    let fetcher = Arc::new(HttpFetcher::new(config.http.clone())?);
    let adapters = registry.create_all(&enabled, fetcher)?;
    let finder = Arc::new(Finder::new(adapters, config.finder.clone()));

    let interrupt = Arc::clone(&finder);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling search...");
            interrupt.cancel();
        }
    });

    let request = SearchRequest::new(cli.term.unwrap_or_default());
    let mut result = finder
        .search(&request, |progress| {
            info!(
                "[{}/{}] {} done",
                progress.completed, progress.total, progress.shop_name
            );
        })
        .await;

    let order = if cli.descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    result_view::sort(&mut result.articles, cli.sort, order);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&result);
    }
    Ok(())
}

/// Pad or cut `text` to exactly `width` characters.
fn limit(text: &str, width: usize) -> String {
    let cut: String = text.chars().take(width).collect();
    format!("{:<width$}", cut, width = width)
}

fn print_table(result: &SearchResult) {
    println!(
        "{} {} {:>12} Shop",
        limit("Name", 50),
        limit("Article Nr", 12),
        "Price"
    );
    for article in result_view::visible(&result.articles) {
        println!(
            "{} {} {:>12} {}",
            limit(&article.name, 50),
            limit(&article.article_number, 12),
            article.formatted_price(),
            article.shop_name()
        );
    }

    for (shop, reason) in result.failures() {
        eprintln!("{}: {}", shop, reason);
    }
    if result.cancelled {
        eprintln!("Search cancelled, results are incomplete.");
    }
}
