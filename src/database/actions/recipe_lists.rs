//! Favorites and shopping cart: per-user membership rows keyed by recipe.

use sqlx::{Pool, Postgres};

use crate::{
    authentication::permissions::ActionType,
    error::{QueryError, RecipeError},
    jwt::SessionData,
    schema::{CartPart, Id},
    shopping_list::{aggregate, file_name, render},
    views::{recipe_short_view, RecipeShortView},
};

use super::{recipes::find_recipe, users::find_user};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    fn table(&self) -> &'static str {
        match self {
            RecipeList::Favorites => "favorites",
            RecipeList::ShoppingCart => "shopping_cart",
        }
    }

    fn already_added(&self) -> &'static str {
        match self {
            RecipeList::Favorites => "Recipe is already in favorites",
            RecipeList::ShoppingCart => "Recipe is already in shopping cart",
        }
    }

    fn not_present(&self) -> &'static str {
        match self {
            RecipeList::Favorites => "Recipe is not in favorites",
            RecipeList::ShoppingCart => "Recipe is not in shopping cart",
        }
    }
}

pub async fn add_to_list(
    list: RecipeList,
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<RecipeShortView, potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;
    let recipe = find_recipe(recipe_id, pool).await?;

    let result = sqlx::query(&format!(
        "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        list.table()
    ))
    .bind(session.user_id)
    .bind(recipe_id)
    .execute(pool)
    .await
    .map_err(RecipeError::from)?;

    if result.rows_affected() == 0 {
        return Err(RecipeError::conflict(list.already_added()).into());
    }

    log::trace!(
        "> User {} added recipe {recipe_id} to {}",
        session.user_id,
        list.table()
    );

    Ok(recipe_short_view(&recipe))
}

pub async fn remove_from_list(
    list: RecipeList,
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;
    find_recipe(recipe_id, pool).await?;

    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
        list.table()
    ))
    .bind(session.user_id)
    .bind(recipe_id)
    .execute(pool)
    .await
    .map_err(QueryError::from)?;

    if result.rows_affected() == 0 {
        return Err(RecipeError::not_present(list.not_present()).into());
    }

    Ok(())
}

pub async fn add_to_favorites(
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<RecipeShortView, potion::Error> {
    add_to_list(RecipeList::Favorites, session, recipe_id, pool).await
}

pub async fn remove_from_favorites(
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    remove_from_list(RecipeList::Favorites, session, recipe_id, pool).await
}

pub async fn add_to_shopping_cart(
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<RecipeShortView, potion::Error> {
    add_to_list(RecipeList::ShoppingCart, session, recipe_id, pool).await
}

pub async fn remove_from_shopping_cart(
    session: &SessionData,
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    remove_from_list(RecipeList::ShoppingCart, session, recipe_id, pool).await
}

pub async fn list_cart_parts(
    user_id: Id,
    pool: &Pool<Postgres>,
) -> Result<Vec<CartPart>, potion::Error> {
    let rows: Vec<CartPart> = sqlx::query_as(
        "
        SELECT i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM shopping_cart c
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE c.user_id = $1
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(rows)
}

/// Returns the attachment file name and the rendered shopping list.
pub async fn download_shopping_cart(
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<(String, String), potion::Error> {
    session.authenticate(ActionType::ManageOwnLists)?;

    let user = find_user(pool, session.user_id).await?;
    let parts = list_cart_parts(session.user_id, pool).await?;
    let items = aggregate(parts)?;

    Ok((file_name(&user.username), render(&user.username, &items)))
}
