mod common;

use axum::http::StatusCode;
use common::setup_app;
use inkpad_models::{get_user, Article, NewArticle, Query};

#[tokio::test]
async fn add_requires_user_two() {
    let app = setup_app();
    app.get("/user/add").await;

    let (status, body) = app.get("/article/add").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("user not found: 2"));

    let conn = app.pool.get().unwrap();
    assert_eq!(Query::<Article>::new().count(&conn).unwrap(), 0);
}

#[tokio::test]
async fn add_then_query_articles_of_user_two() {
    let app = setup_app();
    app.get("/user/add").await;
    app.get("/user/add").await;

    assert_eq!(
        app.get("/article/add").await,
        (StatusCode::OK, "The article is added successfully".to_string())
    );

    {
        let conn = app.pool.get().unwrap();
        let author = get_user(&conn, 2).unwrap().unwrap();
        let mut titles: Vec<String> = author
            .articles(&conn)
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        titles.sort();
        assert_eq!(titles, ["Flask1_study", "Flask_study"]);

        let first = get_user(&conn, 1).unwrap().unwrap();
        assert!(first.articles(&conn).unwrap().is_empty());
    }

    assert_eq!(
        app.get("/article/query").await,
        (StatusCode::OK, "The articles are found successfully".to_string())
    );
}

#[tokio::test]
async fn query_without_user_two_is_not_found() {
    let app = setup_app();

    let (status, _) = app.get("/article/query").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_author_is_a_conflict() {
    let app = setup_app();
    app.get("/user/add").await;

    {
        let conn = app.pool.get().unwrap();
        let author = get_user(&conn, 1).unwrap().unwrap();
        inkpad_models::insert_articles(&conn, &[NewArticle::new("kept", "x").by(&author)])
            .unwrap();
    }

    let (status, body) = app.get("/user/delete").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("still owns 1 article"));

    let conn = app.pool.get().unwrap();
    assert!(get_user(&conn, 1).unwrap().is_some());
}
