//! Biblion Library Management System
//!
//! A Rust implementation of the Biblion library management server, providing
//! a REST JSON API for a book catalog, user accounts, and a borrow/return
//! ledger with atomic stock accounting.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books (catalog)
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route("/books/author/:author", get(api::books::list_books_by_author))
        // Borrowing
        .route("/borrow", post(api::borrows::borrow_book).get(api::borrows::list_borrows))
        .route("/borrow/:id", get(api::borrows::get_borrow))
        .route("/borrow/return/:id", put(api::borrows::return_book))
        // Users
        .route("/users/create", post(api::users::create_user))
        .route("/users/login", post(api::users::login))
        .route("/users/logout", post(api::users::logout))
        .route("/users/all", get(api::users::list_profiles))
        .route("/users/profile", get(api::users::my_profile))
        .route(
            "/users/profile/:id",
            put(api::users::update_user).delete(api::users::delete_user),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
