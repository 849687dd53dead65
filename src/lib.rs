pub mod config;
pub mod convert_provider;
pub mod credentials;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod item;
pub mod log;
pub mod outcome;
pub mod providers;
pub mod ui;

use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, info};

use crate::credentials::ConfigCredentialResolver;
use crate::executor::ConversionExecutor;
use crate::item::Item;
use crate::providers::exchangerate_host::{DEFAULT_BASE_URL, ExchangeRateHostProvider};

/// How `run` renders the pass's outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Execute one conversion pass over the items in `items_path`.
///
/// `continue_on_fail` overrides the config flag when set; `config_path`
/// overrides the default config location.
pub async fn run(
    items_path: &str,
    config_path: Option<&str>,
    continue_on_fail: Option<bool>,
    format: OutputFormat,
) -> Result<()> {
    info!("Currency exchange node starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let items_str = fs::read_to_string(items_path)
        .with_context(|| format!("Failed to read items file: {items_path}"))?;
    let items: Vec<Item> = serde_json::from_str(&items_str)
        .with_context(|| format!("Failed to parse items file: {items_path}"))?;

    let base_url = config
        .provider
        .as_ref()
        .map_or(DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = ExchangeRateHostProvider::new(base_url);
    let resolver = ConfigCredentialResolver::new(config.credentials.api_key.clone());

    let tolerant = continue_on_fail.unwrap_or(config.continue_on_fail);
    let executor = ConversionExecutor::new(&provider, tolerant);

    let spinner = ui::new_spinner("Converting items...");
    let result = executor.run(&items, &resolver).await;
    spinner.finish_and_clear();
    let outcomes = result?;

    match format {
        OutputFormat::Table => println!("{}", outcome::display_as_table(&outcomes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
    }
    Ok(())
}
