// src/routes.rs

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, health, progress, questions, regenerate, systems},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Login and the health probe are public.
/// * Every other route requires a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new().route("/login", post(auth::login));

    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .route(
            "/{id}",
            get(questions::get_question).patch(questions::update_question),
        )
        .route("/{id}/before", get(questions::get_question_before))
        .route("/{id}/accept", patch(questions::set_accepted))
        .route("/{id}/generate", post(regenerate::generate_question))
        .route("/{id}/update-discussion", post(regenerate::update_discussion));

    let protected_routes = Router::new()
        .route("/systems", get(systems::list_systems))
        .route("/progress", get(progress::get_progress))
        .route("/raw-questions", get(questions::list_raw_questions))
        .nest("/questions", question_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .route("/api/test", get(health::health_check))
        .nest("/api", protected_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
