use crate::{
    authentication::permissions::ActionType,
    error::{QueryError, RecipeError},
    form::TagForm,
    jwt::SessionData,
    schema::{Id, LinkedRecipeTag, Tag},
    validation::validate_tag,
};

use sqlx::{Pool, Postgres};

pub async fn get_tag(id: Id, pool: &Pool<Postgres>) -> Result<Option<Tag>, potion::Error> {
    let tag: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(tag)
}

pub async fn fetch_tag(id: Id, pool: &Pool<Postgres>) -> Result<Tag, potion::Error> {
    match get_tag(id, pool).await? {
        Some(tag) => Ok(tag),
        None => Err(RecipeError::not_found("No tag exists with specified id").into()),
    }
}

pub async fn list_tags(pool: &Pool<Postgres>) -> Result<Vec<Tag>, potion::Error> {
    let list: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(list)
}

/// Tags of every recipe in `recipe_ids`, ordered by tag name.
pub async fn list_recipe_tags(
    recipe_ids: &[Id],
    pool: &Pool<Postgres>,
) -> Result<Vec<LinkedRecipeTag>, potion::Error> {
    let list: Vec<LinkedRecipeTag> = sqlx::query_as(
        "
        SELECT rt.recipe_id AS recipe_id, t.id AS tag_id, t.name AS name, t.slug AS slug, t.color AS color
        FROM recipe_tags rt
        INNER JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = ANY($1)
        ORDER BY t.name
    ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(list)
}

/// Subset of `ids` that name existing tags.
pub async fn existing_tag_ids(ids: &[Id], pool: &Pool<Postgres>) -> Result<Vec<Id>, potion::Error> {
    let rows: Vec<(Id,)> = sqlx::query_as("SELECT id FROM tags WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows.into_iter().map(|row| row.0).collect())
}

pub async fn create_tag(
    session: &SessionData,
    form: TagForm,
    pool: &Pool<Postgres>,
) -> Result<Tag, potion::Error> {
    session.authenticate(ActionType::ManageCatalogue)?;
    validate_tag(&form)?;

    let tag: Option<Tag> = sqlx::query_as(
        "INSERT INTO tags (name, slug, color) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.slug)
    .bind(&form.color)
    .fetch_optional(pool)
    .await
    .map_err(RecipeError::from)?;

    match tag {
        Some(tag) => {
            log::info!("> Created tag {} ({})", tag.id, tag.slug);
            Ok(tag)
        }
        None => Err(RecipeError::conflict("Tag with this name, slug or color already exists").into()),
    }
}
