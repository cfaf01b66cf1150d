//! ontoqueryd: the ontology query daemon.
//!
//! Loads the configured ontology once, then answers length-prefixed JSON
//! requests over TCP, one request per connection, until SIGINT/SIGTERM.
//!
//! Configuration precedence: `--config` TOML, then `ONTOQUERY_*` environment
//! variables, then the flags below.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::Result;

use ontoquery::config::ServiceConfig;
use ontoquery::dispatch::Dispatcher;
use ontoquery::oracle::{Oracle, OwlOracle};
use ontoquery::transport::{Server, ShutdownSignal};

#[derive(Parser)]
#[command(name = "ontoqueryd", version, about = "Ontology query daemon")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ontology document to serve.
    #[arg(long)]
    ontology: Option<PathBuf>,

    #[arg(long)]
    bind: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env()?;
    if let Some(ontology) = args.ontology {
        config.ontology = ontology;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    let settings = config.oracle_settings();
    let path = config.ontology.clone();
    let oracle = tokio::task::spawn_blocking(move || OwlOracle::load(&path, &settings))
        .await
        .map_err(|e| miette::miette!("ontology loader panicked: {e}"))??;
    let oracle: Arc<dyn Oracle> = Arc::new(oracle);
    let dispatcher = Arc::new(Dispatcher::new(oracle, config.name_attribute.clone())?);

    let server = Server::bind(config.listen_addr(), dispatcher)
        .await?
        .with_max_frame_bytes(config.max_frame_bytes);
    tracing::info!(
        addr = %server.local_addr()?,
        ontology = %config.ontology.display(),
        "ontoqueryd ready"
    );

    let shutdown = ShutdownSignal::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received");
        trigger.trigger();
    });

    server.run(shutdown).await?;
    tracing::info!("ontoqueryd stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot install SIGTERM handler");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
