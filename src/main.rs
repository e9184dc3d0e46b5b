//! `kitchen` binary: serves the kitchen over HTTP and delivers completed
//! orders to the dining hall.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use kitchen_scheduler::builders::{dining_hall_sink, KitchenBuilder};
use kitchen_scheduler::config::{KitchenConfig, ReferenceData};
use kitchen_scheduler::core::AppResult;
use kitchen_scheduler::runtime::{build_runtime, router, TokioSpawner};
use kitchen_scheduler::util::telemetry::init_tracing;
use tokio::net::TcpListener;

const DEFAULT_CONFIG_PATH: &str = "config/cfg.json";

fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let worker_threads = dotenvy::var("KITCHEN_WORKER_THREADS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let runtime = build_runtime(worker_threads).context("failed to build runtime")?;
    runtime.block_on(serve())
}

fn load_config() -> AppResult<KitchenConfig> {
    let path = dotenvy::var("KITCHEN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    if Path::new(&path).exists() {
        return KitchenConfig::from_file(&path).with_context(|| format!("loading {path}"));
    }
    tracing::warn!(path = %path, "config file not found, using defaults");
    let mut config = KitchenConfig::default();
    config.apply_env().map_err(anyhow::Error::msg)?;
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

async fn serve() -> AppResult<()> {
    let config = load_config()?;
    let reference = ReferenceData::load_dir(&config.reference_dir).with_context(|| {
        format!(
            "loading reference data from {}",
            config.reference_dir.display()
        )
    })?;
    let sink = dining_hall_sink(&config)?;
    let port = config.kitchen_port.clone();

    let kitchen = Arc::new(
        KitchenBuilder::new("kitchen")
            .with_config(config)
            .with_reference(reference)
            .with_sink(Arc::new(sink))
            .start(TokioSpawner::current())?,
    );

    let addr: SocketAddr = format!("0.0.0.0:{port}")
        .parse()
        .with_context(|| format!("invalid kitchen_port {port}"))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("kitchen listening on {}", listener.local_addr()?);

    axum::serve(listener, router(Arc::clone(&kitchen)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    kitchen.shutdown();
    let stats = kitchen.stats();
    tracing::info!(
        received = stats.orders_received,
        distributed = stats.orders_distributed,
        delivery_failures = stats.delivery_failures,
        "kitchen stopped"
    );
    Ok(())
}
