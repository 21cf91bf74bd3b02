use crate::app::handlers::{self, SharedEngine};
use crate::core::{PdfRenderer, ScenarioStore};
use crate::utils::error::Result;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::Instrument;

pub fn build_router<S, R>(engine: SharedEngine<S, R>) -> Router
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/app.js", get(handlers::app_js))
        .route("/healthz", get(handlers::healthz))
        .route("/simulate", post(handlers::simulate::<S, R>))
        .route(
            "/scenarios",
            get(handlers::list_scenarios::<S, R>).post(handlers::create_scenario::<S, R>),
        )
        .route("/scenarios/{id}", get(handlers::get_scenario::<S, R>))
        .route("/report/generate", post(handlers::generate_report::<S, R>))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(request_tracing))
        .with_state(engine)
}

async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, path = %path);

    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{} {}",
            method,
            path
        );
    });
    response
}

pub async fn serve<S, R>(engine: SharedEngine<S, R>, addr: SocketAddr) -> Result<()>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 ROI simulator listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(engine))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                tracing::warn!("Could not register signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
