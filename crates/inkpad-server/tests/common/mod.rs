#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use inkpad_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use inkpad_server::{app, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("inkpad-test.db");
    let settings = DbRuntimeSettings {
        busy_timeout_ms: 1_000,
        pool_max_size: 4,
    };
    let pool = create_pool(path.to_str().unwrap(), settings).expect("failed to create pool");
    run_migrations(&pool.get().unwrap()).expect("failed to run migrations");

    let state = AppState::new(pool.clone()).expect("templates should load");
    TestApp {
        router: app(state),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    /// Issues `GET uri` and returns the status and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}
