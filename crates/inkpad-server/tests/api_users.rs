mod common;

use axum::http::StatusCode;
use common::setup_app;
use inkpad_models::{get_user, Query, User, UserField};

#[tokio::test]
async fn add_creates_demo_user() {
    let app = setup_app();

    let (status, body) = app.get("/user/add").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "The user is created successfully");

    let conn = app.pool.get().unwrap();
    let user = get_user(&conn, 1).unwrap().expect("user 1 should exist");
    assert_eq!(user.username, "Zhang San");
    assert_eq!(user.password, "111111");
    assert_eq!(user.gender, None);
}

#[tokio::test]
async fn query_on_empty_table_is_not_found() {
    let app = setup_app();

    let (status, body) = app.get("/user/query").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "user not found: 1");
}

#[tokio::test]
async fn query_succeeds_once_user_exists() {
    let app = setup_app();
    app.get("/user/add").await;
    app.get("/user/add").await;

    assert_eq!(
        app.get("/user/query").await,
        (StatusCode::OK, "data is got successfully".to_string())
    );
}

#[tokio::test]
async fn update_changes_password_of_first_match() {
    let app = setup_app();
    app.get("/user/add").await;
    app.get("/user/add").await;

    assert_eq!(
        app.get("/user/update").await,
        (StatusCode::OK, "The data is edited successfully".to_string())
    );

    let conn = app.pool.get().unwrap();
    assert_eq!(get_user(&conn, 1).unwrap().unwrap().password, "222222");
    assert_eq!(get_user(&conn, 2).unwrap().unwrap().password, "111111");
}

#[tokio::test]
async fn update_without_matching_user_is_not_found() {
    let app = setup_app();

    let (status, _) = app.get("/user/update").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_user_one_then_reports_not_found() {
    let app = setup_app();
    app.get("/user/add").await;
    app.get("/user/add").await;

    assert_eq!(
        app.get("/user/delete").await,
        (StatusCode::OK, "The data is deleted successfully".to_string())
    );

    {
        let conn = app.pool.get().unwrap();
        assert!(get_user(&conn, 1).unwrap().is_none());
        let remaining = Query::<User>::new()
            .filter_by(UserField::Username, "Zhang San".to_string())
            .count(&conn)
            .unwrap();
        assert_eq!(remaining, 1);
    }

    let (status, _) = app.get("/user/delete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_updates_all_succeed() {
    let app = std::sync::Arc::new(setup_app());
    app.get("/user/add").await;

    let mut requests = tokio::task::JoinSet::new();
    for _ in 0..64 {
        let app = app.clone();
        requests.spawn(async move { app.get("/user/update").await });
    }

    let mut failures = Vec::new();
    while let Some(result) = requests.join_next().await {
        let (status, body) = result.expect("request task panicked");
        if status != StatusCode::OK {
            failures.push((status, body));
        }
    }
    assert!(failures.is_empty(), "failed updates: {failures:?}");

    let conn = app.pool.get().unwrap();
    assert_eq!(get_user(&conn, 1).unwrap().unwrap().password, "222222");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_and_updates_do_not_lock_out() {
    let app = std::sync::Arc::new(setup_app());
    app.get("/user/add").await;

    let mut requests = tokio::task::JoinSet::new();
    for i in 0..32 {
        let app = app.clone();
        let uri = if i % 2 == 0 { "/user/add" } else { "/user/update" };
        requests.spawn(async move { app.get(uri).await.0 });
    }
    while let Some(result) = requests.join_next().await {
        assert_eq!(result.expect("request task panicked"), StatusCode::OK);
    }

    let conn = app.pool.get().unwrap();
    assert_eq!(
        Query::<User>::new()
            .filter_by(UserField::Username, "Zhang San".to_string())
            .count(&conn)
            .unwrap(),
        17
    );
}
