//! NameHub API Gateway
//!
//! Public browsing, search and submission endpoints plus the admin
//! moderation API, served from a single axum router.

pub mod handlers;
pub mod middleware;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use namehub_common::{auth::AdminAuth, config::AppConfig, db::DbPool, Repository};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub auth: Arc<AdminAuth>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, metrics: Option<PrometheusHandle>) -> Self {
        let auth = Arc::new(AdminAuth::new(&config.auth));
        Self {
            config: Arc::new(config),
            db,
            auth,
            metrics,
        }
    }

    pub fn repo(&self) -> Repository {
        Repository::new(self.db.clone())
    }
}

impl FromRef<AppState> for Arc<AdminAuth> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let public_routes = Router::new()
        .route("/home", get(handlers::listings::home))
        .route("/latest", get(handlers::listings::latest))
        .route("/popular", get(handlers::listings::popular))
        .route("/search", get(handlers::listings::search))
        .route("/group-names", get(handlers::listings::list_group_names))
        .route("/categories", get(handlers::categories::list_categories))
        .route("/categories/{id}", get(handlers::categories::get_category))
        .route("/collections", get(handlers::collections::list_collections))
        .route("/collections/featured", get(handlers::collections::featured_collections))
        .route("/collections/{id}", get(handlers::collections::get_collection))
        .route("/submit", post(handlers::submissions::submit))
        .route("/like", post(handlers::submissions::like))
        .route("/copy", post(handlers::submissions::copy));

    let admin_routes = Router::new()
        .route("/login", post(handlers::admin::login))
        .route("/logout", post(handlers::admin::logout))
        .route("/check-auth", get(handlers::admin::check_auth))
        .route("/stats", get(handlers::admin::stats))
        .route("/pending-group-names", get(handlers::admin::pending_group_names))
        .route(
            "/group-names",
            get(handlers::admin::list_group_names).post(handlers::admin::create_group_name),
        )
        .route(
            "/group-names/{id}",
            put(handlers::admin::update_group_name).delete(handlers::admin::delete_group_name),
        )
        .route("/group-names/{id}/update", put(handlers::admin::reassign_group_name))
        .route("/group-names/{id}/review", post(handlers::admin::review_group_name))
        .route(
            "/categories",
            get(handlers::categories::admin_list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::categories::update_category).delete(handlers::categories::delete_category),
        )
        .route(
            "/collections",
            get(handlers::collections::admin_list_collections).post(handlers::collections::create_collection),
        )
        .route(
            "/collections/{id}",
            put(handlers::collections::update_collection).delete(handlers::collections::delete_collection),
        );

    let timeout = TimeoutLayer::new(state.config.request_timeout());

    // Compose the app
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", public_routes.nest("/admin", admin_routes))
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}
