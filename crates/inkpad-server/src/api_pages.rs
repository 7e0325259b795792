//! Text and template pages. None of these touch the database.

use crate::api::ApiError;
use crate::templates::render;
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;

/// Name shown on the blog detail page.
const VISITOR_NAME: &str = "Each";

/// A user as shown by the demo pages. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DemoUser {
    pub username: String,
    pub email: String,
}

impl DemoUser {
    fn sample() -> Self {
        Self {
            username: "Each".to_string(),
            email: "123@q.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Book {
    name: &'static str,
    author: &'static str,
}

/// Query parameters for `GET /book/list`.
#[derive(Debug, Deserialize)]
pub struct BookListQuery {
    /// Requested page; echoed back and otherwise unused.
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// Handler for `GET /`.
pub async fn index_handler() -> &'static str {
    "Hello world!!!!!"
}

/// Handler for `GET /profile`.
pub async fn profile_handler() -> &'static str {
    "This is personal profile."
}

/// Handler for `GET /blog/{blog_id}`.
pub async fn blog_handler(Path(blog_id): Path<String>) -> String {
    format!("blog: {blog_id}")
}

/// Handler for `GET /blog/detail/{blog_id}`.
pub async fn blog_detail_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(blog_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = Context::new();
    ctx.insert("blog_id", &blog_id);
    ctx.insert("username", VISITOR_NAME);
    render(&state.templates, "blog_detail.html", &ctx)
}

/// Handler for `GET /book/list?page=N`.
///
/// A non-integer `page` is rejected by the `Query` extractor with 400.
pub async fn book_list_handler(Query(params): Query<BookListQuery>) -> String {
    format!("the page you request is {}", params.page)
}

/// Handler for `GET /render1`.
pub async fn render1_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    render(&state.templates, "index.html", &Context::new())
}

/// Handler for `GET /class`: an object and a map in the same context.
pub async fn class_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = Context::new();
    ctx.insert("user", &DemoUser::sample());
    ctx.insert(
        "person",
        &serde_json::json!({
            "username": "Zhang San",
            "email": "zhang@q.com",
        }),
    );
    render(&state.templates, "class1.html", &ctx)
}

/// Handler for `GET /filter`.
pub async fn filter_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = Context::new();
    ctx.insert("user", &DemoUser::sample());
    ctx.insert("mytime", &chrono::Local::now().naive_local());
    render(&state.templates, "filter.html", &ctx)
}

/// Handler for `GET /control`.
pub async fn control_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let books = [
        Book {
            name: "san guo",
            author: "luo guan zhong",
        },
        Book {
            name: "shui hu",
            author: "shi nai an",
        },
    ];
    let mut ctx = Context::new();
    ctx.insert("age", &17);
    ctx.insert("books", &books);
    render(&state.templates, "control.html", &ctx)
}

/// Handler for `GET /child1`.
pub async fn child1_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    render(&state.templates, "child1.html", &Context::new())
}

/// Handler for `GET /child2`.
pub async fn child2_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    render(&state.templates, "child2.html", &Context::new())
}

/// Handler for `GET /static`.
pub async fn static_page_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    render(&state.templates, "static.html", &Context::new())
}

/// Handler for `GET /register`.
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    render(&state.templates, "register.html", &Context::new())
}

/// Assets referenced by the templates, keyed by path under `/static/`.
const STATIC_ASSETS: &[(&str, &str, &str)] = &[
    (
        "css/style.css",
        "text/css; charset=utf-8",
        include_str!("../static/css/style.css"),
    ),
    (
        "js/my.js",
        "text/javascript; charset=utf-8",
        include_str!("../static/js/my.js"),
    ),
];

/// Handler for `GET /static/{*path}`.
pub async fn static_asset_handler(Path(path): Path<String>) -> Response {
    match STATIC_ASSETS.iter().find(|(name, _, _)| *name == path) {
        Some((_, content_type, body)) => {
            ([(header::CONTENT_TYPE, *content_type)], *body).into_response()
        }
        None => ApiError::NotFound(format!("static asset not found: {path}")).into_response(),
    }
}
