//! Error types for the record layer.

/// Errors that can occur while reading or writing users and articles.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No user row has the given id.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// An article names an author id that does not exist.
    #[error("author not found: {0}")]
    AuthorNotFound(i64),

    /// The user still owns articles, so it cannot be deleted.
    #[error("user {user_id} still owns {count} article(s)")]
    UserHasArticles {
        /// The user that was asked to be deleted.
        user_id: i64,
        /// How many articles reference it.
        count: i64,
    },
}
