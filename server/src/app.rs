//! Core application

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::api::ApiServer;
use crate::core::cli;
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::domain::collector::{MemoryCollector, TraceCollector};

pub struct CoreApp {
    pub config: AppConfig,
    pub collector: Arc<dyn TraceCollector>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let cli = cli::parse();
        let config = AppConfig::load(&cli);
        Self::init_logging(config.log_json);

        tracing::debug!(?config, "Application starting");

        let collector: Arc<dyn TraceCollector> =
            Arc::new(MemoryCollector::new(config.collector_capacity));

        let app = Self { config, collector };
        ApiServer::new(app).start().await
    }

    fn init_logging(json: bool) {
        let filter =
            EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        if json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
