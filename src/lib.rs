//! Bank account service.
//!
//! A REST API for opening accounts, logging in as an account owner and moving
//! funds between accounts. Every request addressing a specific account is
//! checked by the ownership guard: the caller's session token must have been
//! issued for that account.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: [`store::AccountStore`] over PostgreSQL (sqlx) or in memory
//! - **Authentication**: Argon2 password hashes, HS256 session tokens in `x-jwt-token`
//! - **Format**: JSON requests/responses

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Routes addressing one account; the guard checks the caller owns `{id}`
    let owned_routes = Router::new()
        .route(
            "/accounts/{id}",
            get(handlers::accounts::get_account).delete(handlers::accounts::delete_account),
        )
        .route(
            "/accounts/transfer/{id}",
            post(handlers::transfers::transfer),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::ownership_guard,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/login", post(handlers::auth::login))
        .route(
            "/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .merge(owned_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
