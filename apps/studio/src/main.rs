mod config;
mod errors;
mod export;
mod layout;
mod models;
mod routes;
mod state;
mod templates;
mod viewport;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::document::PdfAssembler;
use crate::export::raster::ResvgRasterizer;
use crate::export::ExportPipeline;
use crate::layout::A4_WIDTH_PX;
use crate::routes::build_router;
use crate::state::AppState;
use crate::viewport::ResizeWatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Résumé Studio v{}", env!("CARGO_PKG_VERSION"));

    // Font loading scans the system; keep it off the async workers.
    let rasterizer = tokio::task::spawn_blocking(ResvgRasterizer::with_system_fonts).await?;
    let assembler = PdfAssembler::new(config.pagination, config.jpeg_quality);
    let exporter = ExportPipeline::new(Arc::new(rasterizer), Arc::new(assembler), config.export_settings());
    if exporter.is_available() {
        info!(
            pagination = ?config.pagination,
            scale = config.raster_scale,
            "Export pipeline ready"
        );
    } else {
        warn!("No system fonts found; PDF export is disabled");
    }

    let resize = ResizeWatcher::spawn(A4_WIDTH_PX, config.preview_settle);

    // Build app state
    let state = AppState::new(config.clone(), exporter, resize);

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::new(config.bind_addr, config.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
