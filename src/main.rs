use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use wayfarer::api::AppState;
use wayfarer::cache::CatalogCache;
use wayfarer::config::LoggingConfig;
use wayfarer::email;
use wayfarer::seed;
use wayfarer::store::Db;
use wayfarer::web;
use wayfarer::WayfarerConfig;

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    if config.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = WayfarerConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);
    tracing::info!(version = wayfarer::VERSION, "starting wayfarer");

    let db = Db::connect(&config.database)
        .await
        .context("Failed to open database")?;
    db.migrate().await.context("Failed to apply database schema")?;

    match std::env::args().nth(1).as_deref() {
        Some("seed") => {
            seed::run(&db).await?;
            tracing::info!("seeding finished");
        }
        None | Some("serve") => {
            let cache = CatalogCache::open(expand_home(&config.cache.location), config.cache_ttl())
                .context("Failed to open catalog cache")?;
            let notifier = email::notifier_from_config(&config.email);
            let state = AppState {
                db,
                cache,
                notifier,
                config: Arc::new(config.clone()),
            };
            web::run(&config, state).await?;
        }
        Some(other) => bail!("Unknown command '{other}'. Expected 'serve' or 'seed'."),
    }

    Ok(())
}
