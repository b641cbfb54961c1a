use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{health, protected, public};
use crate::middleware::{jwt_auth_middleware, require_role, RoleGate};
use crate::state::AppState;

/// Build the full HTTP application.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/health", get(health::health))
        .merge(public_routes())
        // Protected API
        .nest("/api/v1", api_routes(state.clone()))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/login", post(auth::login))
        .route("/login/refresh", post(auth::refresh))
}

/// Everything under /api/v1: reads for any role, writes for admins, all
/// behind token authentication.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/whoami", get(protected::auth::whoami))
        .merge(reader_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn reader_routes() -> Router<AppState> {
    use protected::{cats, treatments, visits};

    Router::new()
        .route("/cats", get(cats::list))
        .route("/cats/:id", get(cats::show))
        .route("/cats/:id/history", get(cats::history))
        .route("/cats/:id/visits", get(cats::visits))
        .route("/visits", get(visits::list))
        .route("/visits/filter", get(visits::filter))
        .route("/visits/:id", get(visits::show))
        .route("/visits/:id/treatments", get(visits::treatments))
        .route("/treatments", get(treatments::list))
        .route("/treatments/:id", get(treatments::show))
        .route_layer(middleware::from_fn_with_state(RoleGate::READERS, require_role))
}

fn admin_routes() -> Router<AppState> {
    use protected::{cats, treatments, users, visits};

    Router::new()
        .route("/cats", post(cats::create))
        .route("/cats/:id", put(cats::update).delete(cats::delete))
        .route("/visits", post(visits::create))
        .route("/visits/:id", put(visits::update).delete(visits::delete))
        .route("/treatments", post(treatments::create))
        .route("/treatments/:id", put(treatments::update).delete(treatments::delete))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route_layer(middleware::from_fn_with_state(RoleGate::ADMINS, require_role))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
