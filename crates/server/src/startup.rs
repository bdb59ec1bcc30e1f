use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{
    cart::{CartDeps, CartStore, TracingNotifier},
    file::kv_store::FileKvStore,
    remote::http_catalog::HttpCatalog,
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Wire the production collaborators into a cart store.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    runtime::ensure_env(&cfg.storage.path).await?;

    let catalog = Arc::new(HttpCatalog::new(cfg.api.base_url.clone(), cfg.api.timeout())?);
    let storage = FileKvStore::open(&cfg.storage.path).await?;
    let deps = CartDeps {
        catalog: catalog.clone(),
        stock: catalog,
        storage,
        notifier: Arc::new(TracingNotifier),
    };
    let cart = CartStore::load(&cfg.storage.cart_key, deps).await?;
    Ok(AppState { cart: Arc::new(cart) })
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, api = %cfg.api.base_url, storage = %cfg.storage.path, "starting cart server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
