//! IDM Server
//!
//! Serves the identity chaincode over HTTP:
//! - `POST /api/invoke/{function}` - register, mergeData, approve, consent changes
//! - `POST /api/query/{function}` - listPendingApprovals, getPerson, getPersonForRequestor
//! - `GET /health` - ledger reachability
//! - `/swagger-ui` - OpenAPI documentation
//!
//! ## Configuration
//!
//! Read from `idm.toml` (see `idm_config::ConfigLoader` for the search path),
//! then overridden by environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IDM_CONFIG` | - | Explicit config file path |
//! | `IDM_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `IDM_HTTP_PORT` | `8080` | HTTP port |
//! | `IDM_LEDGER_BACKEND` | `memory` | `memory` or `sqlite` |
//! | `IDM_SQLITE_URL` | `sqlite://./data/idm-ledger.db?mode=rwc` | SQLite ledger URL |
//! | `IDM_DEV_MODE` | `false` | Seed demo identities on startup |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured output |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use idm_config::{AppConfig, ConfigLoader, LedgerBackend};
use idm_core::dispatch::chaincode_router;
use idm_core::shared::health_api::health_router;
use idm_core::IdentityChaincode;
use idm_ledger::{LedgerStore, MemoryLedger, SqliteLedger};

#[derive(Parser, Debug)]
#[command(name = "idm-server")]
#[command(about = "Identity records with institutional approval and visibility consent")]
struct Args {
    /// Config file (overrides the search path)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Ledger backend: memory or sqlite (overrides config)
    #[arg(long)]
    ledger: Option<String>,

    /// Print an example config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", AppConfig::example_toml());
        return Ok(());
    }

    idm_common::init_logging("idm-server");

    let config = load_config(&args)?;
    info!(
        ledger = ?config.ledger.backend,
        dev_mode = config.dev_mode,
        "Starting IDM Server"
    );

    let ledger = open_ledger(&config).await?;
    let chaincode = Arc::new(IdentityChaincode::new(ledger.clone()));

    if config.dev_mode {
        seed_demo_identities(&chaincode).await;
    }

    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api", chaincode_router(chaincode))
        .split_for_parts();

    openapi.info.title = "IDM Chaincode API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some(
        "Identity records with institutional approval and peer visibility consent".to_string(),
    );

    let app = Router::new()
        .merge(router)
        .merge(health_router(ledger))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on http://{}", addr);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("IDM Server shutdown complete");
    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("Failed to load configuration")?;

    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(ledger) = &args.ledger {
        config.ledger.backend = LedgerBackend::parse(ledger)?;
    }
    config.validate()?;
    Ok(config)
}

async fn open_ledger(config: &AppConfig) -> Result<Arc<dyn LedgerStore>> {
    match config.ledger.backend {
        LedgerBackend::Memory => {
            warn!("Using in-memory ledger, state is lost on shutdown");
            Ok(Arc::new(MemoryLedger::new()))
        }
        LedgerBackend::Sqlite => {
            let url = &config.ledger.sqlite_url;
            if let Some(dir) = sqlite_parent_dir(url) {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create ledger directory {}", dir.display())
                })?;
            }
            info!("Opening SQLite ledger: {}", url);
            let ledger = SqliteLedger::connect(url).await?;
            Ok(Arc::new(ledger))
        }
    }
}

/// Directory holding the database file of a `sqlite://` URL, if any.
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Demo identities for local development. Existing ids are left alone.
async fn seed_demo_identities(chaincode: &IdentityChaincode) {
    let seeds = [
        (
            "alice",
            "alice-dev",
            r#"[{"key":"dob","value":"2000-01-01","approvingInstitution":"bank1"},
                {"key":"address","value":"1 Main St","approvingInstitution":"bank2"}]"#,
        ),
        ("bob", "bob-dev", "[]"),
        ("bank1", "bank1-dev", "[]"),
    ];

    for (id, secret, entries) in seeds {
        let args = [id.to_string(), secret.to_string(), entries.to_string()];
        match chaincode.invoke("register", &args).await {
            Ok(()) => info!(person_id = id, "Seeded demo identity"),
            Err(e) => warn!(person_id = id, error = %e, "Demo identity not seeded"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
