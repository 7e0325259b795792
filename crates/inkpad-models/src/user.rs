//! The `user` table.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::article::{Article, ArticleField, NewArticle};
use crate::error::ModelError;
use crate::query::{Column, Query, Record};

/// A registered account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    /// Storage-assigned id. Never changes once assigned.
    pub id: i64,
    pub username: String,
    /// Stored as given, in plain text.
    pub password: String,
    pub gender: Option<String>,
}

/// Fields for a user that has not been inserted yet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub gender: Option<String>,
}

impl NewUser {
    /// A new user with no gender recorded.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            gender: None,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

/// Filterable `user` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Username,
    Password,
    Gender,
}

impl Column for UserField {
    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Password => "password",
            Self::Gender => "gender",
        }
    }
}

impl Record for User {
    type Field = UserField;
    const TABLE: &'static str = "user";
    const COLUMNS: &'static str = "id, username, password, gender";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            gender: row.get(3)?,
        })
    }
}

impl User {
    /// The articles whose author is this user, lowest id first.
    pub fn articles(&self, conn: &Connection) -> Result<Vec<Article>, ModelError> {
        Query::<Article>::new()
            .filter_by(ArticleField::AuthorId, self.id)
            .all(conn)
    }

    /// Adds an article to this user's collection.
    ///
    /// Equivalent to inserting a [`NewArticle`] whose author is `self`.
    pub fn add_article(
        &self,
        conn: &Connection,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Article, ModelError> {
        let draft = NewArticle::new(title, content).by(self);
        crate::article::insert_article(conn, &draft)
    }
}

/// Inserts a user and returns it with its assigned id.
pub fn insert_user(conn: &Connection, new_user: &NewUser) -> Result<User, ModelError> {
    let user = conn.query_row(
        "INSERT INTO user (username, password, gender) VALUES (?1, ?2, ?3)
         RETURNING id, username, password, gender",
        params![new_user.username, new_user.password, new_user.gender],
        User::from_row,
    )?;
    tracing::debug!(user_id = user.id, "inserted user");
    Ok(user)
}

/// Fetches a user by id. A missing row is `Ok(None)`.
pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, ModelError> {
    Query::<User>::new().filter_by(UserField::Id, id).first(conn)
}

/// Persists every mutable field of `user` back to its row.
///
/// # Errors
///
/// Returns `ModelError::UserNotFound` if the row no longer exists.
pub fn save_user(conn: &Connection, user: &User) -> Result<(), ModelError> {
    let count = conn.execute(
        "UPDATE user SET username = ?1, password = ?2, gender = ?3 WHERE id = ?4",
        params![user.username, user.password, user.gender, user.id],
    )?;
    if count == 0 {
        return Err(ModelError::UserNotFound(user.id));
    }
    Ok(())
}

/// Deletes a user by id.
///
/// Users that still own articles are not deleted; the articles must be
/// removed or reassigned first.
///
/// # Errors
///
/// Returns `ModelError::UserHasArticles` if any article references the user,
/// or `ModelError::UserNotFound` if no such user exists.
pub fn delete_user(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let owned = Query::<Article>::new()
        .filter_by(ArticleField::AuthorId, id)
        .count(conn)?;
    if owned > 0 {
        return Err(ModelError::UserHasArticles {
            user_id: id,
            count: owned,
        });
    }

    let count = conn.execute("DELETE FROM user WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(ModelError::UserNotFound(id));
    }
    tracing::debug!(user_id = id, "deleted user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::migrated_conn;

    #[test]
    fn insert_then_get_round_trips_fields() {
        let conn = migrated_conn();
        let inserted =
            insert_user(&conn, &NewUser::new("Zhang San", "111111").with_gender("m")).unwrap();

        let fetched = get_user(&conn, inserted.id).unwrap().expect("user should exist");
        assert_eq!(fetched.username, "Zhang San");
        assert_eq!(fetched.password, "111111");
        assert_eq!(fetched.gender.as_deref(), Some("m"));
        assert_eq!(fetched, inserted);
    }

    #[test]
    fn ids_increase_monotonically() {
        let conn = migrated_conn();
        let a = insert_user(&conn, &NewUser::new("a", "1")).unwrap();
        let b = insert_user(&conn, &NewUser::new("b", "2")).unwrap();
        assert!(b.id > a.id);

        // AUTOINCREMENT never reuses a deleted id.
        delete_user(&conn, b.id).unwrap();
        let c = insert_user(&conn, &NewUser::new("c", "3")).unwrap();
        assert!(c.id > b.id);
    }

    #[test]
    fn get_missing_user_is_none() {
        let conn = migrated_conn();
        assert!(get_user(&conn, 1).unwrap().is_none());
    }

    #[test]
    fn save_persists_mutated_password() {
        let conn = migrated_conn();
        insert_user(&conn, &NewUser::new("Zhang San", "111111")).unwrap();

        let mut user = Query::<User>::new()
            .filter_by(UserField::Username, "Zhang San".to_string())
            .first(&conn)
            .unwrap()
            .expect("user should exist");
        user.password = "222222".to_string();
        save_user(&conn, &user).unwrap();

        let fetched = get_user(&conn, user.id).unwrap().unwrap();
        assert_eq!(fetched.password, "222222");
    }

    #[test]
    fn save_vanished_user_is_not_found() {
        let conn = migrated_conn();
        let user = User {
            id: 99,
            username: "ghost".to_string(),
            password: "x".to_string(),
            gender: None,
        };
        assert!(matches!(
            save_user(&conn, &user),
            Err(ModelError::UserNotFound(99))
        ));
    }

    #[test]
    fn delete_then_get_is_none() {
        let conn = migrated_conn();
        let user = insert_user(&conn, &NewUser::new("Zhang San", "111111")).unwrap();

        delete_user(&conn, user.id).unwrap();
        assert!(get_user(&conn, user.id).unwrap().is_none());
        assert!(matches!(
            delete_user(&conn, user.id),
            Err(ModelError::UserNotFound(_))
        ));
    }

    #[test]
    fn delete_is_restricted_while_articles_exist() {
        let conn = migrated_conn();
        let user = insert_user(&conn, &NewUser::new("Zhang San", "111111")).unwrap();
        user.add_article(&conn, "Flask_study", "Flaskxxxx").unwrap();

        let err = delete_user(&conn, user.id).expect_err("delete should be restricted");
        match err {
            ModelError::UserHasArticles { user_id, count } => {
                assert_eq!(user_id, user.id);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(get_user(&conn, user.id).unwrap().is_some());
    }

    #[test]
    fn uncommitted_insert_is_rolled_back() {
        let mut conn = migrated_conn();
        {
            let tx = conn.transaction().unwrap();
            insert_user(&tx, &NewUser::new("Zhang San", "111111")).unwrap();
            // dropped without commit
        }
        assert_eq!(Query::<User>::new().count(&conn).unwrap(), 0);
    }
}
