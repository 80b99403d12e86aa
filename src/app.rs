use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, SecurityConfig};
use crate::database::store::CaseFileStore;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::CaseFileService;

/// Shared handler state
pub struct AppState<S> {
    pub case_files: Arc<CaseFileService<S>>,
}

impl<S: CaseFileStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            case_files: Arc::new(CaseFileService::new(store)),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            case_files: self.case_files.clone(),
        }
    }
}

pub fn router<S: CaseFileStore>(state: AppState<S>) -> Router {
    let config = config::config();

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health::<S>))
        // Protected API
        .merge(case_file_routes::<S>())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn case_file_routes<S: CaseFileStore>() -> Router<AppState<S>> {
    use protected::{case_files, projects, staff_users};

    Router::new()
        .route(
            "/api/case-files",
            get(case_files::list::<S>).post(case_files::create::<S>),
        )
        .route(
            "/api/case-files/initiation-options",
            get(case_files::initiation_options::<S>),
        )
        .route(
            "/api/case-files/case-file-numbers/:case_file_number",
            get(case_files::get_by_number::<S>),
        )
        .route(
            "/api/case-files/:case_file_id",
            get(case_files::get::<S>).patch(case_files::update::<S>),
        )
        .route(
            "/api/case-files/:case_file_id/officers",
            get(case_files::officers::<S>),
        )
        .route("/api/projects", get(projects::list::<S>))
        .route("/api/staff-users", get(staff_users::list::<S>))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
