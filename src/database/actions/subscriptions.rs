//! Follow relations between users and recipe authors.

use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    authentication::permissions::ActionType,
    error::{QueryError, RecipeError},
    jwt::SessionData,
    schema::{Id, Recipe, User},
    views::{subscription_view, SubscriptionView},
};

use super::{recipes::list_author_recipes, users::find_user};

pub async fn subscribe(
    session: &SessionData,
    author_id: Id,
    recipes_limit: Option<usize>,
    pool: &Pool<Postgres>,
) -> Result<SubscriptionView, potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;
    let author = find_user(pool, author_id).await?;

    if author.id == session.user_id {
        return Err(RecipeError::invalid("You cannot follow yourself").into());
    }

    let result = sqlx::query(
        "INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(session.user_id)
    .bind(author_id)
    .execute(pool)
    .await
    .map_err(RecipeError::from)?;

    if result.rows_affected() == 0 {
        return Err(RecipeError::conflict("You are already subscribed to this author").into());
    }

    log::trace!("> User {} subscribed to {author_id}", session.user_id);

    let recipes = list_author_recipes(&[author_id], pool).await?;

    Ok(subscription_view(&author, &recipes, recipes_limit))
}

pub async fn unsubscribe(
    session: &SessionData,
    author_id: Id,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;
    find_user(pool, author_id).await?;

    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
        .bind(session.user_id)
        .bind(author_id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    if result.rows_affected() == 0 {
        return Err(RecipeError::not_present("You are not subscribed to this author").into());
    }

    Ok(())
}

/// Authors the caller follows in subscription order, each with their newest recipes.
pub async fn fetch_subscriptions(
    session: &SessionData,
    recipes_limit: Option<usize>,
    pool: &Pool<Postgres>,
) -> Result<Vec<SubscriptionView>, potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;

    let authors: Vec<User> = sqlx::query_as(
        "
        SELECT u.* FROM subscriptions s
        INNER JOIN users u ON u.id = s.author_id
        WHERE s.user_id = $1
        ORDER BY s.id
    ",
    )
    .bind(session.user_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    let author_ids: Vec<Id> = authors.iter().map(|author| author.id).collect();
    let mut recipes: HashMap<Id, Vec<Recipe>> = HashMap::new();
    list_author_recipes(&author_ids, pool)
        .await?
        .into_iter()
        .for_each(|recipe| recipes.entry(recipe.author_id).or_default().push(recipe));

    Ok(authors
        .iter()
        .map(|author| {
            let authored = recipes.remove(&author.id).unwrap_or_default();
            subscription_view(author, &authored, recipes_limit)
        })
        .collect())
}
