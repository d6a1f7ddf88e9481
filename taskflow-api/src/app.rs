/// Application state and router builder
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskflow_api::{app::{build_router, AppState}, config::Config};
/// use taskflow_shared::store::MemoryStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_lookup(|key| match key {
///     "DATABASE_URL" => Some("memory://".to_string()),
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     _ => None,
/// })?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
/// # let _ = app;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::session::require_session, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use taskflow_shared::{
    services::{Services, TokenSettings},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; everything inside is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend, also used by the health check
    pub store: Arc<dyn Store>,

    /// Business operations over `store`
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let services = Services::new(
            store.clone(),
            TokenSettings {
                secret: config.jwt.secret.clone(),
                expires_in: config.jwt.expires_in(),
            },
        );

        Self {
            store,
            services,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET    /                              liveness banner
/// GET    /health                        health check
/// POST   /api/auth/register
/// POST   /api/auth/login
/// GET    /api/auth/logout
/// GET    /api/auth/me                   *
/// GET    /api/projects                  *
/// POST   /api/projects                  *
/// GET    /api/projects/:id              *
/// PUT    /api/projects/:id              *
/// DELETE /api/projects/:id              *
/// PUT    /api/projects/:id/add-member   *
/// GET    /api/projects/:id/stats        *
/// GET    /api/projects/:id/tasks        *
/// POST   /api/projects/:id/tasks        *
/// PUT    /api/tasks/:id                 *
/// DELETE /api/tasks/:id                 *
/// GET    /api/tasks/:id/comments        *
/// POST   /api/tasks/:id/comments        *
/// DELETE /api/comments/:id              *
/// ```
///
/// Routes marked `*` require a session.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", get(routes::auth::logout));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/api/projects/:id/add-member", put(routes::projects::add_member))
        .route("/api/projects/:id/stats", get(routes::projects::project_stats))
        .route(
            "/api/projects/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/api/tasks/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::add_comment),
        )
        .route(
            "/api/comments/:id",
            axum::routing::delete(routes::comments::delete_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
