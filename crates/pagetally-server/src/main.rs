use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use pagetally_duckdb::DuckDbStore;
use pagetally_server::state::AppState;

/// `pagetally health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$PAGETALLY_PORT/`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PAGETALLY_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

/// Default log filter: info for every pagetally crate (the bin target plus
/// the three library crates — a directive only matches its own target), on
/// top of whatever RUST_LOG sets.
fn default_env_filter() -> Result<tracing_subscriber::EnvFilter> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in [
        "pagetally=info",
        "pagetally_server=info",
        "pagetally_core=info",
        "pagetally_duckdb=info",
    ] {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

fn open_store(cfg: &pagetally_core::config::Config) -> Result<DuckDbStore> {
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/pagetally.db", cfg.data_dir);
    DuckDbStore::open(
        &db_path,
        &cfg.duckdb_memory_limit,
        cfg.session_ttl(),
        cfg.dedupe_window(),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Health-check subcommand — handled before tokio does any real work so
    // the binary stays small and fast as a Docker HEALTHCHECK probe.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(default_env_filter()?)
        .json()
        .init();

    let cfg = pagetally_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let state = Arc::new(AppState::new(cfg.clone()));

    // Stay-alive readiness policy: a failed open does not crash the process.
    // Until the store attaches, tracking and stats requests surface 503 and
    // a background task keeps retrying.
    match open_store(&cfg) {
        Ok(store) => state.attach_store(Arc::new(store)).await,
        Err(e) => {
            error!(error = %e, "Store open failed — serving 503 until it connects");
            let state = Arc::clone(&state);
            let cfg = cfg.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    match open_store(&cfg) {
                        Ok(store) => {
                            state.attach_store(Arc::new(store)).await;
                            break;
                        }
                        Err(e) => error!(error = %e, "Store open retry failed"),
                    }
                }
            });
        }
    }

    // Spawn the background TTL purge sweep.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.run_purge_loop().await;
        });
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = pagetally_server::app::build_app(Arc::clone(&state));

    info!(
        port = cfg.port,
        session_ttl_secs = cfg.session_ttl_secs,
        dedupe_window_secs = cfg.dedupe_window_secs,
        "pagetally listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
