//! The `article` table and its link back to `user`.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::error::ModelError;
use crate::query::{Column, Query, Record};
use crate::user::{get_user, User, UserField};

/// A piece of content written by a user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Id of the authoring user. Nullable in the schema, always set by the
    /// handlers.
    pub author_id: Option<i64>,
}

/// An article that has not been inserted yet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author_id: Option<i64>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author_id: None,
        }
    }

    /// Sets the author. The same column backs [`User::articles`].
    pub fn by(mut self, author: &User) -> Self {
        self.author_id = Some(author.id);
        self
    }
}

/// Filterable `article` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleField {
    Id,
    Title,
    Content,
    AuthorId,
}

impl Column for ArticleField {
    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Content => "content",
            Self::AuthorId => "author_id",
        }
    }
}

impl Record for Article {
    type Field = ArticleField;
    const TABLE: &'static str = "article";
    const COLUMNS: &'static str = "id, title, content, author_id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author_id: row.get(3)?,
        })
    }
}

impl Article {
    /// The authoring user, or `None` when no author is set.
    pub fn author(&self, conn: &Connection) -> Result<Option<User>, ModelError> {
        match self.author_id {
            Some(author_id) => get_user(conn, author_id),
            None => Ok(None),
        }
    }
}

fn ensure_author_exists(conn: &Connection, author_id: i64) -> Result<(), ModelError> {
    let exists = Query::<User>::new()
        .filter_by(UserField::Id, author_id)
        .count(conn)?
        > 0;
    if !exists {
        return Err(ModelError::AuthorNotFound(author_id));
    }
    Ok(())
}

fn insert_unchecked(conn: &Connection, draft: &NewArticle) -> Result<Article, ModelError> {
    let article = conn.query_row(
        "INSERT INTO article (title, content, author_id) VALUES (?1, ?2, ?3)
         RETURNING id, title, content, author_id",
        params![draft.title, draft.content, draft.author_id],
        Article::from_row,
    )?;
    Ok(article)
}

pub(crate) fn insert_article(conn: &Connection, draft: &NewArticle) -> Result<Article, ModelError> {
    if let Some(author_id) = draft.author_id {
        ensure_author_exists(conn, author_id)?;
    }
    insert_unchecked(conn, draft)
}

/// Inserts a batch of articles, returning them in input order with ids.
///
/// Every referenced author is checked before anything is written, so a bad
/// author id leaves the table untouched.
///
/// # Errors
///
/// Returns `ModelError::AuthorNotFound` for the first author id with no
/// matching user.
pub fn insert_articles(
    conn: &Connection,
    drafts: &[NewArticle],
) -> Result<Vec<Article>, ModelError> {
    let authors: BTreeSet<i64> = drafts.iter().filter_map(|d| d.author_id).collect();
    for author_id in authors {
        ensure_author_exists(conn, author_id)?;
    }

    let mut articles = Vec::with_capacity(drafts.len());
    for draft in drafts {
        articles.push(insert_unchecked(conn, draft)?);
    }
    tracing::debug!(count = articles.len(), "inserted articles");
    Ok(articles)
}

/// Fetches an article by id. A missing row is `Ok(None)`.
pub fn get_article(conn: &Connection, id: i64) -> Result<Option<Article>, ModelError> {
    Query::<Article>::new().filter_by(ArticleField::Id, id).first(conn)
}
