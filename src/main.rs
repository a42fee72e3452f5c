// src/main.rs - print-host binary: config, store seeding, web server
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use printhub_rs::config;
use printhub_rs::dispatch::DispatchService;
use printhub_rs::executor::SimulatedExecutor;
use printhub_rs::store::RecordStore;
use printhub_rs::web;

#[derive(Parser)]
#[command(name = "print-host", about = "University managed-print dispatch service")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(default_value = "printhub.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting PrintHub dispatch service");

    let cli = Cli::parse();
    tracing::info!("Loading configuration from: {}", cli.config);
    let config = config::load_config(&cli.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", cli.config, e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    let store = Arc::new(RecordStore::new());
    for seed in &config.printers {
        let printer = store
            .create_printer(
                Some(seed.id.clone()),
                seed.brand_name.clone(),
                seed.model.clone(),
                seed.status,
            )
            .await;
        tracing::info!(
            "registered printer {} ({} {}, {:?})",
            printer.id,
            printer.brand_name,
            printer.model,
            printer.status
        );
    }

    let executor = Arc::new(SimulatedExecutor::new(Duration::from_millis(
        config.executor.print_latency_ms,
    )));
    tracing::info!(
        "simulated print latency: {} ms per document",
        config.executor.print_latency_ms
    );

    let service = DispatchService::new(store, executor);
    service.recover_pending().await;

    let app = web::api::create_router(service);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Web API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
