//! inkpad server library logic.

pub mod api;
pub mod api_articles;
pub mod api_pages;
pub mod api_users;
pub mod config;
pub mod templates;

use axum::{routing::get, Extension, Json, Router};
use inkpad_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tera::Tera;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Parsed templates with custom filters registered.
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Builds state around `pool`, loading the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if a template fails to parse.
    pub fn new(pool: DbPool) -> Result<Self, templates::TemplateError> {
        Ok(Self {
            pool,
            templates: Arc::new(templates::load_templates()?),
        })
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(api_pages::index_handler))
        .route("/profile", get(api_pages::profile_handler))
        .route("/blog/{blog_id}", get(api_pages::blog_handler))
        .route(
            "/blog/detail/{blog_id}",
            get(api_pages::blog_detail_handler),
        )
        .route("/book/list", get(api_pages::book_list_handler))
        .route("/render1", get(api_pages::render1_handler))
        .route("/class", get(api_pages::class_handler))
        .route("/filter", get(api_pages::filter_handler))
        .route("/control", get(api_pages::control_handler))
        .route("/child1", get(api_pages::child1_handler))
        .route("/child2", get(api_pages::child2_handler))
        .route("/static", get(api_pages::static_page_handler))
        .route("/static/{*path}", get(api_pages::static_asset_handler))
        .route("/register", get(api_pages::register_handler));

    let records = Router::new()
        .route("/user/add", get(api_users::add_user_handler))
        .route("/user/query", get(api_users::query_user_handler))
        .route("/user/update", get(api_users::update_user_handler))
        .route("/user/delete", get(api_users::delete_user_handler))
        .route("/article/add", get(api_articles::add_articles_handler))
        .route("/article/query", get(api_articles::query_articles_handler));

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .merge(records)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
