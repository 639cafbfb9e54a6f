mod config;
mod controllers;
mod game;
mod llm;
mod prelude;
mod result;
mod sessions;

pub use crate::result::Result;

use std::{net::SocketAddr, sync::Arc};

use axum::{error_handling::HandleErrorLayer, http::StatusCode, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};

use crate::llm::{OllamaClient, TextGenerator};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<config::Config>,
    llm: Arc<dyn TextGenerator>,
}

#[tokio::main]
async fn main() -> Result {
    dotenv::dotenv().ok();

    let cfg = config::build()?;

    tracing_subscriber::fmt()
        .with_max_level(cfg.log_level)
        .init();

    let llm = OllamaClient::from_config(&cfg)?;
    let addr: SocketAddr = format!("{}:{}", cfg.server_host, cfg.server_port).parse()?;

    tracing::info!(
        model = %cfg.model_name,
        ollama = %cfg.ollama_url,
        "using language model"
    );

    let state = AppState {
        cfg: Arc::new(cfg),
        llm: Arc::new(llm),
    };

    let router = build_router(state);

    tracing::info!(%addr, "listening");

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await?;

    return Ok(());
}

fn build_router(state: AppState) -> Router {
    let session_store = sessions::store::build(&state.cfg);

    let session_service = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_| async {
            return StatusCode::BAD_REQUEST;
        }))
        .layer(
            SessionManagerLayer::new(session_store)
                .with_expiry(Expiry::OnSessionEnd)
                .with_secure(false)
                .with_same_site(SameSite::Lax),
        );

    let router = Router::new();

    // dynamic paths
    let router = controllers::add_routes(router);

    // static assets
    let router = router.nest_service("/assets", ServeDir::new("assets"));

    return router
        .with_state(state)
        .layer(session_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());
}
