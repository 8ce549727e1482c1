//! Interview web server - browser chat front end for the interview engine.

mod pages;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use interview::io::config::{CONFIG_FILE, load_config};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "interview-web")]
#[command(about = "Web chat front end for the interview engine")]
struct Args {
    /// Address to bind the server to (overrides `server.bind`)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(long)]
    port: Option<u16>,

    /// Project directory (contains interview.toml)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("interview_web=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let project_dir = args.project_dir.canonicalize().unwrap_or(args.project_dir);
    let cfg = load_config(&project_dir.join(CONFIG_FILE))?;
    info!(project_dir = %project_dir.display(), "starting interview-web");

    let state = AppState::from_config(&project_dir, &cfg)?;
    tokio::spawn(sweep_idle_sessions(state.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(routes::index))
        .nest("/api", routes::api_router(cfg.max_upload_bytes))
        .layer(cors)
        .with_state(state);

    let bind = args.bind.unwrap_or(cfg.server.bind);
    let port = args.port.unwrap_or(cfg.server.port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {bind}:{port}"))?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop sessions nobody has touched within the idle timeout.
async fn sweep_idle_sessions(state: AppState) {
    let mut ticker = tokio::time::interval(state.idle_timeout() / 4);
    loop {
        ticker.tick().await;
        state.prune_idle(Instant::now()).await;
    }
}
