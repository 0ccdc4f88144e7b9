//! Runs one storefront search from the command line and prints the result
//! as JSON.
//!
//! Usage:
//!   storefront-search --context shop.json --variant listing c=5 manufacturer=42 p=2

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use storefront_model::ShopContext;
use storefront_search::{logging, Config, SearchService};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Listing,
    Search,
    AjaxSearch,
    AjaxListing,
    AjaxCount,
    Navigation,
}

#[derive(Parser, Debug)]
#[clap(name = "storefront-search")]
#[clap(about = "Run a storefront product search and print the result")]
struct Args {
    /// Shop context as JSON (shop, customer groups, currency)
    #[clap(long)]
    context: PathBuf,

    /// Which criteria the request parameters are turned into
    #[clap(long, value_enum, default_value = "listing")]
    variant: Variant,

    /// Category to navigate in (navigation variant only)
    #[clap(long, required_if_eq("variant", "navigation"))]
    category: Option<i64>,

    /// Pretty-print the result
    #[clap(long)]
    pretty: bool,

    /// Request parameters as key=value pairs
    params: Vec<String>,
}

fn parse_params(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("Parameter '{pair}' is not a key=value pair"))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration (defaults, file, STOREFRONT__* env)
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    // Logging goes to stderr; flushed when the guard drops at exit
    let _telemetry_guard =
        logging::init_logging(&config).context("Failed to initialize logging/telemetry")?;

    let raw_context = std::fs::read_to_string(&args.context)
        .with_context(|| format!("Failed to read {}", args.context.display()))?;
    let context: ShopContext =
        serde_json::from_str(&raw_context).context("Failed to parse shop context")?;
    let params = parse_params(&args.params)?;

    // Backend plus lookup services, core handlers only
    let service = SearchService::connect(&config)
        .await
        .context("Failed to initialize search backend")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = service.backend(),
        variant = ?args.variant,
        "Running search"
    );

    let factory = service.criteria_factory();
    let criteria = match args.variant {
        Variant::Listing => factory.create_listing_criteria(&params, &context),
        Variant::Search => factory.create_search_criteria(&params, &context),
        Variant::AjaxSearch => factory.create_ajax_search_criteria(&params, &context),
        Variant::AjaxListing => factory.create_ajax_listing_criteria(&params, &context),
        Variant::AjaxCount => factory.create_ajax_count_criteria(&params, &context),
        Variant::Navigation => factory.create_product_navigation_criteria(
            &params,
            &context,
            args.category.context("--category is required for navigation")?,
        ),
    }
    .context("Failed to build criteria")?;

    let result = match service.search(&criteria, &context).await {
        Ok(result) => result,
        // Outages get a generic message, the cause stays in the log
        Err(e) if e.is_unavailable() => {
            tracing::error!(error = %e, "Search backend unavailable");
            anyhow::bail!("Search is currently unavailable");
        }
        Err(e) => return Err(e.into()),
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}
