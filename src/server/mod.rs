//! HTTP surface: routes, shared state, and error responses.

mod error;
pub mod handlers;
mod state;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::future::Future;
use std::time::Instant;
use tokio::net::TcpListener;

pub use error::{AppError, AppResult, StateError};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/r/{subreddit}", get(handlers::subreddit_feed))
        .route(
            "/r/{subreddit}/{category}",
            get(handlers::subreddit_category_feed),
        )
        .route("/haiku", get(handlers::haiku_feed))
        .route("/haiku/{category}", get(handlers::haiku_category_feed))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Access log line per request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Listening");
    }
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
