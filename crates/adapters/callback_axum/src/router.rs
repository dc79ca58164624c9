//! Axum router assembly.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::routes::{CallbackRoutes, Route};

/// Build the callback server's axum [`Router`].
///
/// Every request other than `/health` is dispatched through the route
/// table, so routes registered after the server starts are picked up
/// immediately. Includes a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build(routes: CallbackRoutes) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(routes)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Resolve the request path against the route table.
async fn dispatch(State(routes): State<CallbackRoutes>, uri: Uri) -> Response {
    match routes.lookup(uri.path()) {
        Some(Route::Redirect { target }) => {
            tracing::info!(path = %uri.path(), target = %target, "redirect route hit");
            (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
        }
        Some(Route::Callback { handler }) => {
            tracing::info!(path = %uri.path(), "callback route hit");
            handler();
            (StatusCode::OK, "OK").into_response()
        }
        None => {
            tracing::debug!(path = %uri.path(), "no route registered");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
