//! User and Article records for inkpad.
//!
//! Every operation takes an explicit `&rusqlite::Connection`. Writes become
//! durable when the caller commits; handlers open a `rusqlite::Transaction`
//! (which derefs to a `Connection`) per request and commit it once their
//! single unit of work is done.
//!
//! The one-to-many relationship between [`User`] and [`Article`] lives in a
//! single column, `article.author_id`. [`User::add_article`] and
//! [`NewArticle::by`] both write that column, and [`User::articles`] /
//! [`Article::author`] read it, so the two directions cannot disagree.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inkpad_models::{insert_user, NewUser, Query, User, UserField};
//!
//! let tx = conn.transaction()?;
//! insert_user(&tx, &NewUser::new("Zhang San", "111111"))?;
//! tx.commit()?;
//!
//! let named = Query::<User>::new().filter_by(UserField::Username, "Zhang San".to_string());
//! for user in named.all(&conn)? {
//!     tracing::info!(id = user.id, "found");
//! }
//! ```

mod article;
mod error;
mod query;
mod user;

pub use article::{get_article, insert_articles, Article, ArticleField, NewArticle};
pub use error::ModelError;
pub use query::{Column, Query, Record};
pub use user::{delete_user, get_user, insert_user, save_user, NewUser, User, UserField};
