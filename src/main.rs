// src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{any, get, post},
};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod api_client;
mod edit_form;
mod errors;
mod handlers;
mod models;
mod notify;
mod proxy;
mod state;
mod views;

#[cfg(test)]
mod test_support;

use crate::api_client::HttpCatalogApi;
use crate::handlers::*;
use crate::state::{AppState, UpstreamConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Initializing server...");

    // The backend catalog API everything is forwarded to.
    let upstream_origin =
        env::var("UPSTREAM_ORIGIN").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let origin = match Url::parse(&upstream_origin) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!("Invalid UPSTREAM_ORIGIN '{}': {}", upstream_origin, e);
            std::process::exit(1);
        }
    };

    let http = reqwest::Client::new();
    let app_state = AppState {
        api: Arc::new(HttpCatalogApi::new(http.clone(), origin.clone())),
        http,
        upstream: UpstreamConfig { origin },
    };

    let app = Router::new()
        .route(
            "/admin/products/{id}/edit",
            get(edit_product_screen_handler),
        )
        .route("/htmx/admin/products/{id}", post(update_product_handler))
        .route(
            "/htmx/admin/products/{id}/image",
            post(upload_product_image_handler),
        )
        .route("/api/{*path}", any(proxy::proxy_handler))
        .route("/upload", any(proxy::proxy_handler))
        .route("/upload/{*path}", any(proxy::proxy_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not bind to {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}
