//! User CRUD demo handlers.
//!
//! Each handler performs one unit of work in its own transaction and replies
//! with a fixed confirmation string.

use crate::api::{run_unit_of_work, user_not_found, ApiError};
use crate::AppState;
use axum::extract::Extension;
use inkpad_models::{delete_user, get_user, insert_user, save_user, NewUser, Query, User, UserField};
use std::sync::Arc;

const DEMO_USERNAME: &str = "Zhang San";
const DEMO_PASSWORD: &str = "111111";
const UPDATED_PASSWORD: &str = "222222";
/// Id looked up by the query and delete demos.
const DEMO_USER_ID: i64 = 1;

fn by_demo_username() -> Query<User> {
    Query::new().filter_by(UserField::Username, DEMO_USERNAME.to_string())
}

/// Handler for `GET /user/add`.
pub async fn add_user_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    let user = run_unit_of_work(state, |tx| {
        Ok(insert_user(tx, &NewUser::new(DEMO_USERNAME, DEMO_PASSWORD))?)
    })
    .await?;

    tracing::info!(user_id = user.id, "user created");
    Ok("The user is created successfully")
}

/// Handler for `GET /user/query`.
///
/// Logs the user with id 1, then every user named `Zhang San`.
pub async fn query_user_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    run_unit_of_work(state, |tx| {
        let user = get_user(tx, DEMO_USER_ID)?.ok_or_else(|| user_not_found(DEMO_USER_ID))?;
        tracing::info!(user_id = user.id, username = %user.username, "fetched user by id");

        let matched = by_demo_username().for_each(tx, |user| {
            tracing::info!(user_id = user.id, username = %user.username, "matched user");
        })?;
        tracing::info!(matched, username = DEMO_USERNAME, "filtered users by username");
        Ok(())
    })
    .await?;

    Ok("data is got successfully")
}

/// Handler for `GET /user/update`.
pub async fn update_user_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    let user_id = run_unit_of_work(state, |tx| {
        let mut user = by_demo_username().first(tx)?.ok_or_else(|| {
            ApiError::NotFound(format!("no user named {DEMO_USERNAME}"))
        })?;
        user.password = UPDATED_PASSWORD.to_string();
        save_user(tx, &user)?;
        Ok(user.id)
    })
    .await?;

    tracing::info!(user_id, "user password updated");
    Ok("The data is edited successfully")
}

/// Handler for `GET /user/delete`.
pub async fn delete_user_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<&'static str, ApiError> {
    run_unit_of_work(state, |tx| {
        let user = get_user(tx, DEMO_USER_ID)?.ok_or_else(|| user_not_found(DEMO_USER_ID))?;
        delete_user(tx, user.id)?;
        Ok(())
    })
    .await?;

    tracing::info!(user_id = DEMO_USER_ID, "user deleted");
    Ok("The data is deleted successfully")
}
