mod config;
mod db;
mod ledger;
mod models;
mod run;
mod view;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    setup_logging(&config);

    config.ensure_data_dir()?;
    let mut db = db::Database::open(&config.db_path)?;

    run::as_cli(&args, &mut db)
}

fn setup_logging(config: &config::Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
