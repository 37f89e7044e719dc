//! Greenhouse simulation job API server.

use sim_api::server::{self, AppState};
use sim_jobs::{JobStore, StatusResolver, SubmissionService};
use sim_store::RedisKvStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REDIS_OP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://redis:6379".to_string());
    let kv = RedisKvStore::new(&redis_url, REDIS_OP_TIMEOUT)?;
    kv.ping().await?;
    tracing::info!("connected to redis at {}", redis_url);

    let store = Arc::new(JobStore::new(Arc::new(kv)));
    let state = Arc::new(AppState {
        submission: SubmissionService::new(Arc::clone(&store)),
        resolver: StatusResolver::new(store),
    });

    let app = server::router(state);
    let addr: SocketAddr = std::env::var("SIM_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    tracing::info!("simulation API listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
