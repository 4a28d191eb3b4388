use crate::{
    authentication::permissions::ActionType,
    error::{QueryError, RecipeError},
    form::{IngredientForm, IngredientQuery},
    jwt::SessionData,
    schema::{Id, Ingredient},
    validation::validate_ingredient,
};

use sqlx::{Pool, Postgres};

/// Escapes LIKE wildcards so the user input only ever matches literally.
fn like_prefix(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}

/// Ingredients ordered by name, optionally filtered by a case-insensitive name prefix.
pub async fn list_ingredients(
    query: &IngredientQuery,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, potion::Error> {
    let list: Vec<Ingredient> = match query.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => sqlx::query_as("SELECT * FROM ingredients WHERE name ILIKE $1 ORDER BY name")
            .bind(like_prefix(name))
            .fetch_all(pool)
            .await,
        None => sqlx::query_as("SELECT * FROM ingredients ORDER BY name")
            .fetch_all(pool)
            .await,
    }
    .map_err(QueryError::from)?;

    Ok(list)
}

pub async fn get_ingredient(
    id: Id,
    pool: &Pool<Postgres>,
) -> Result<Option<Ingredient>, potion::Error> {
    let row: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

pub async fn fetch_ingredient(id: Id, pool: &Pool<Postgres>) -> Result<Ingredient, potion::Error> {
    match get_ingredient(id, pool).await? {
        Some(ingredient) => Ok(ingredient),
        None => Err(RecipeError::not_found("No ingredient exists with specified id").into()),
    }
}

/// Subset of `ids` that name existing ingredients.
pub async fn existing_ingredient_ids(
    ids: &[Id],
    pool: &Pool<Postgres>,
) -> Result<Vec<Id>, potion::Error> {
    let rows: Vec<(Id,)> = sqlx::query_as("SELECT id FROM ingredients WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows.into_iter().map(|row| row.0).collect())
}

pub async fn create_ingredient(
    session: &SessionData,
    form: IngredientForm,
    pool: &Pool<Postgres>,
) -> Result<Ingredient, potion::Error> {
    session.authenticate(ActionType::ManageCatalogue)?;
    validate_ingredient(&form)?;

    let row: Option<Ingredient> = sqlx::query_as(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.measurement_unit)
    .fetch_optional(pool)
    .await
    .map_err(RecipeError::from)?;

    match row {
        Some(ingredient) => Ok(ingredient),
        None => Err(RecipeError::conflict("Ingredient with this name already exists").into()),
    }
}
