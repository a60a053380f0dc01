// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unsplash_client::{SearchParams, SearchParamsBuilder, UnsplashClient};
use unsplash_config::{load as load_config, ApiConfig, SearchDefaults, TelemetryConfig};

/// Search Unsplash photos and print the result page as JSON.
#[derive(Debug, Parser)]
#[command(name = "unsplash", version)]
struct Args {
    /// Search terms.
    query: String,

    #[arg(long)]
    page: Option<u32>,

    /// Results per page (1-30). Defaults to the configured value.
    #[arg(long)]
    per_page: Option<u32>,

    /// landscape, portrait or squarish.
    #[arg(long)]
    orientation: Option<String>,

    /// low or high.
    #[arg(long)]
    content_filter: Option<String>,

    /// relevant or latest.
    #[arg(long)]
    order_by: Option<String>,

    #[arg(long)]
    color: Option<String>,

    /// Collection ID to search within. May be repeated.
    #[arg(long = "collection")]
    collections: Vec<String>,

    /// ISO 639-1 language of the query.
    #[arg(long)]
    lang: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_tracing(&config.telemetry);

    let client = build_client(&config.api)?;
    let params = build_params(&args, &config.search)?;
    info!(target: "cli", query = params.query(), page = params.page(), "searching");

    let response = tokio::select! {
        response = client.search(&params) => response?,
        _ = tokio::signal::ctrl_c() => bail!("search cancelled"),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_client(api: &ApiConfig) -> Result<UnsplashClient> {
    let access_key = api
        .access_key
        .as_deref()
        .context("no access key configured; set UNSPLASH_API__ACCESS_KEY or api.access_key")?;

    if api.timeout_secs == 0 {
        bail!("api.timeout_secs must be at least 1");
    }

    Ok(UnsplashClient::builder(access_key)
        .base_url(api.base_url.as_str())
        .timeout(Duration::from_secs(api.timeout_secs))
        .build()?)
}

fn build_params(args: &Args, defaults: &SearchDefaults) -> unsplash_client::Result<SearchParams> {
    let mut builder = SearchParamsBuilder::new()
        .with_query(args.query.as_str())?
        .with_per_page(args.per_page.unwrap_or(defaults.per_page))?;

    if let Some(page) = args.page {
        builder = builder.with_page(page)?;
    }
    if let Some(orientation) = args.orientation.as_deref() {
        builder = builder.with_orientation(orientation)?;
    }
    if let Some(filter) = args.content_filter.as_deref() {
        builder = builder.with_content_filter(filter)?;
    }
    if let Some(order_by) = args.order_by.as_deref() {
        builder = builder.with_order_by(order_by)?;
    }
    if let Some(color) = args.color.as_deref() {
        builder = builder.with_color(color)?;
    }
    if !args.collections.is_empty() {
        builder = builder.with_collections(&args.collections)?;
    }
    if let Some(lang) = args.lang.as_deref() {
        builder = builder.with_lang(lang)?;
    }

    builder.build()
}
