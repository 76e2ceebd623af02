use axum::{routing::get, Json, Router};
use env::Env;
use eyre::{Context as _, Result};
use ledger::Ledger;
use log::info;
use serde_json::{json, Value};

pub mod analytics;
pub mod cors;
pub mod error;
pub mod factors;
pub mod logs;
pub mod params;
pub mod recommendations;
pub mod structure;
pub mod view;

pub fn router(ledger: Ledger) -> Router {
    Router::new()
        .merge(structure::routes())
        .merge(logs::routes())
        .merge(factors::routes())
        .merge(analytics::routes())
        .merge(recommendations::routes())
        .route("/health", get(health))
        .with_state(ledger)
}

pub async fn serve(ledger: Ledger, env: Env) -> Result<()> {
    let app = router(ledger).layer(cors::layer(&env));
    let listener = tokio::net::TcpListener::bind(env.host())
        .await
        .with_context(|| format!("Failed to bind {}", env.host()))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
