//! HTTP API for the kickabout service
//!
//! Builds the axum router (domain endpoints plus the operational ones from
//! [`crate::metrics`]) and the server that runs it.

pub mod routes;
pub mod server;

pub use server::ApiServer;

use crate::metrics::ops_router;
use crate::service::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Full application router with CORS, tracing and request metrics
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route(
            "/players",
            get(routes::list_players).post(routes::add_player),
        )
        .route("/players/{player_name}/ratings", post(routes::rate_player))
        .route(
            "/players/{player_name}/availability",
            put(routes::set_availability).get(routes::get_availability),
        )
        .route("/average_ratings", get(routes::average_ratings))
        .route("/select_teams", post(routes::select_teams))
        .merge(ops_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    track_http_metrics,
                )),
        )
        .with_state(state)
}

/// Record request count and latency per matched route
async fn track_http_metrics(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state
        .metrics()
        .record_http_request(&endpoint, response.status().as_u16(), start.elapsed());

    response
}
