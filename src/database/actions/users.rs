use std::collections::HashSet;

use crate::{
    authentication::cryptography::{hash_password, verify_password},
    error::{QueryError, RecipeError},
    form::{RegisterForm, SetPasswordForm},
    jwt::SessionData,
    schema::{Id, User, UserRole},
    validation::{validate_password, validate_registration},
    views::{user_view, UserView},
};

use sqlx::{Pool, Postgres};

pub async fn get_user_by_id(
    pool: &Pool<Postgres>,
    user_id: Id,
) -> Result<Option<User>, potion::Error> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

pub async fn find_user(pool: &Pool<Postgres>, user_id: Id) -> Result<User, potion::Error> {
    match get_user_by_id(pool, user_id).await? {
        Some(user) => Ok(user),
        None => Err(RecipeError::not_found("No user exists with specified id").into()),
    }
}

pub async fn list_users_by_id(ids: &[Id], pool: &Pool<Postgres>) -> Result<Vec<User>, potion::Error> {
    let rows: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1) ORDER BY id")
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows)
}

/// Ids of every author `user_id` follows.
pub async fn subscribed_author_ids(
    user_id: Id,
    pool: &Pool<Postgres>,
) -> Result<HashSet<Id>, potion::Error> {
    let rows: Vec<(Id,)> = sqlx::query_as("SELECT author_id FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows.into_iter().map(|row| row.0).collect())
}

async fn subscribed_set(
    session: Option<&SessionData>,
    pool: &Pool<Postgres>,
) -> Result<HashSet<Id>, potion::Error> {
    match session {
        Some(session) => subscribed_author_ids(session.user_id, pool).await,
        None => Ok(HashSet::new()),
    }
}

pub async fn list_users(
    session: Option<&SessionData>,
    pool: &Pool<Postgres>,
) -> Result<Vec<UserView>, potion::Error> {
    let rows: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;
    let subscribed = subscribed_set(session, pool).await?;

    Ok(rows
        .iter()
        .map(|user| user_view(user, subscribed.contains(&user.id)))
        .collect())
}

pub async fn fetch_user(
    session: Option<&SessionData>,
    user_id: Id,
    pool: &Pool<Postgres>,
) -> Result<UserView, potion::Error> {
    let user = find_user(pool, user_id).await?;
    let subscribed = subscribed_set(session, pool).await?;

    Ok(user_view(&user, subscribed.contains(&user.id)))
}

/// The caller's own profile. A token for a deleted user is NotFound.
pub async fn fetch_me(session: &SessionData, pool: &Pool<Postgres>) -> Result<UserView, potion::Error> {
    let user = find_user(pool, session.user_id).await?;

    Ok(user_view(&user, false))
}

/// Creates a user with a validated username and an argon2 hash of the password.
pub async fn register_user(form: RegisterForm, pool: &Pool<Postgres>) -> Result<UserView, potion::Error> {
    validate_registration(&form)?;

    let password = hash_password(&form.password)?;

    let row: Option<User> = sqlx::query_as(
        "
        INSERT INTO users (email, username, first_name, last_name, password, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT DO NOTHING RETURNING *;
    ",
    )
    .bind(&form.email)
    .bind(&form.username)
    .bind(&form.first_name)
    .bind(&form.last_name)
    .bind(password)
    .bind(UserRole::User)
    .fetch_optional(pool)
    .await
    .map_err(RecipeError::from)?;

    match row {
        Some(user) => {
            log::info!("> Registered user {} ({})", user.id, user.username);
            Ok(user_view(&user, false))
        }
        None => Err(RecipeError::conflict("User with this email or username already exists").into()),
    }
}

/// Replaces the caller's password after checking the current one.
pub async fn set_password(
    session: &SessionData,
    form: SetPasswordForm,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    validate_password(&form.new_password)?;
    let user = find_user(pool, session.user_id).await?;

    if !verify_password(&form.current_password, &user.password)? {
        return Err(RecipeError::invalid("Invalid password").into());
    }

    let password = hash_password(&form.new_password)?;
    sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(password)
        .bind(user.id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    log::info!("> User {} changed their password", user.id);

    Ok(())
}
