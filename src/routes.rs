// routes.rs
use std::time::Duration;

use axum::{
    routing::{delete, get, post},
    Router,
};
use http::{header::CONTENT_TYPE, Method};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

pub fn create_routes(pool: SqlitePool) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/enquetes",
            get(handlers::list_polls).post(handlers::create_poll),
        )
        .route(
            "/enquetes/{id}",
            get(handlers::get_poll).delete(handlers::delete_poll),
        )
        .route(
            "/enquetes/{id}/opcoes",
            get(handlers::list_options).post(handlers::add_option),
        )
        .route(
            "/enquetes/{id}/opcoes/{opcao_id}",
            delete(handlers::delete_option),
        )
        .route("/enquetes/{id}/votar", post(handlers::vote))
        .route("/enquetes/{id}/resultados", get(handlers::results));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(pool)
}
