use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::access_middleware;
use crate::state::AppState;

/// Full application router.
///
/// The access middleware wraps every route, including the fallback, so an
/// unknown path is still classified (and fails closed) before it can 404.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(page_routes())
        .merge(api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), access_middleware))
        .with_state(state)
}

/// `app` plus the transport layers configured for this deployment
pub fn app_with_layers(state: AppState, security: &SecurityConfig, request_logging: bool) -> Router {
    let mut router = app(state);
    if security.enable_cors {
        router = router.layer(cors_layer(security));
    }
    if request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

fn public_routes() -> Router<AppState> {
    use public::{auth, pages};

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/health", get(pages::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
}

fn page_routes() -> Router<AppState> {
    use protected::pages;

    Router::new()
        .route("/pt", get(pages::pt_home))
        .route("/pt/members", get(pages::pt_members))
        .route("/pt/exercises", get(pages::pt_exercises))
        .route("/pt/programs", get(pages::pt_programs))
        .route("/member/:id", get(pages::member_page))
}

fn api_routes() -> Router<AppState> {
    use protected::{auth, exercises, members, programs};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/exercises", get(exercises::list).post(exercises::create))
        .route(
            "/api/exercises/:id",
            get(exercises::get).put(exercises::update).delete(exercises::delete),
        )
        .route("/api/programs", get(programs::list).post(programs::create))
        .route(
            "/api/programs/:id",
            get(programs::get).put(programs::update).delete(programs::delete),
        )
        .route("/api/members", get(members::list).post(members::create))
        .route("/api/members/:id", get(members::get))
}
