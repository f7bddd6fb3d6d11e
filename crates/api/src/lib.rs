//! HTTP API server for pickup point receptions.
//!
//! Provides REST endpoints for pickup point registration, the reception
//! lifecycle and the paginated tree listing, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use common::SystemClock;
use domain::{PickupPointRegistry, ReceptionService};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/pvz",
            post(routes::pvz::create::<S>).get(routes::pvz::list::<S>),
        )
        .route("/receptions", post(routes::receptions::open::<S>))
        .route("/products", post(routes::receptions::scan::<S>))
        .route(
            "/pvz/{pvz_id}/delete_last_product",
            post(routes::pvz::delete_last_product::<S>),
        )
        .route(
            "/pvz/{pvz_id}/close_last_reception",
            post(routes::pvz::close_last_reception::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .route_layer(axum::middleware::from_fn(middleware::track_http_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the registry and reception service over one store.
pub fn create_state<S: Store + Clone + 'static>(store: S, config: &Config) -> Arc<AppState<S>> {
    let clock = Arc::new(SystemClock);

    Arc::new(AppState {
        registry: PickupPointRegistry::with_settings(
            store.clone(),
            config.page_limits(),
            clock.clone(),
        ),
        receptions: ReceptionService::with_clock(store, clock),
    })
}
