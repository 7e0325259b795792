//! Article demo handlers. Both work on the articles of user 2.

use crate::api::{run_unit_of_work, user_not_found, ApiError};
use crate::AppState;
use axum::extract::Extension;
use inkpad_models::{get_user, insert_articles, NewArticle};
use std::sync::Arc;

const DEMO_AUTHOR_ID: i64 = 2;

/// Handler for `GET /article/add`.
///
/// Inserts two articles authored by user 2 in a single commit.
pub async fn add_articles_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    let inserted = run_unit_of_work(state, |tx| {
        let author = get_user(tx, DEMO_AUTHOR_ID)?.ok_or_else(|| user_not_found(DEMO_AUTHOR_ID))?;
        let drafts = [
            NewArticle::new("Flask_study", "Flaskxxxx").by(&author),
            NewArticle::new("Flask1_study", "Flaskxxxxxx").by(&author),
        ];
        Ok(insert_articles(tx, &drafts)?)
    })
    .await?;

    tracing::info!(
        author_id = DEMO_AUTHOR_ID,
        count = inserted.len(),
        "articles created"
    );
    Ok("The article is added successfully")
}

/// Handler for `GET /article/query`.
///
/// Logs the title of every article authored by user 2.
pub async fn query_articles_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    let articles = run_unit_of_work(state, |tx| {
        let author = get_user(tx, DEMO_AUTHOR_ID)?.ok_or_else(|| user_not_found(DEMO_AUTHOR_ID))?;
        Ok(author.articles(tx)?)
    })
    .await?;

    for article in &articles {
        tracing::info!(article_id = article.id, title = %article.title, "article");
    }
    Ok("The articles are found successfully")
}
