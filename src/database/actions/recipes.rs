use std::collections::{HashMap, HashSet};

use sqlx::{Pool, Postgres, QueryBuilder, Transaction};

use crate::{
    authentication::permissions::ActionType,
    error::{QueryError, RecipeError},
    form::{RecipeFilter, RecipeForm},
    images::{decode_image, ImageStore},
    jwt::SessionData,
    schema::{Id, Recipe, RecipeFlags, RecipePart, Tag, User},
    validation::{ensure_all_exist, validate_recipe},
    views::{recipe_view, user_view, RecipeView},
};

use super::{
    ingredients::existing_ingredient_ids,
    tags::{existing_tag_ids, list_recipe_tags},
    users::{list_users_by_id, subscribed_author_ids},
};

pub async fn get_recipe(id: Id, pool: &Pool<Postgres>) -> Result<Option<Recipe>, potion::Error> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

/// Like [`get_recipe`] but a missing recipe is an error.
pub async fn find_recipe(id: Id, pool: &Pool<Postgres>) -> Result<Recipe, potion::Error> {
    match get_recipe(id, pool).await? {
        Some(recipe) => Ok(recipe),
        None => Err(RecipeError::not_found("No recipe exists with specified id").into()),
    }
}

/// Recipes of the given authors, newest first.
pub async fn list_author_recipes(
    author_ids: &[Id],
    pool: &Pool<Postgres>,
) -> Result<Vec<Recipe>, potion::Error> {
    let rows: Vec<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE author_id = ANY($1) ORDER BY id DESC")
            .bind(author_ids)
            .fetch_all(pool)
            .await
            .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn list_recipe_parts(
    recipe_ids: &[Id],
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipePart>, potion::Error> {
    let rows: Vec<RecipePart> = sqlx::query_as(
        "
        SELECT ri.recipe_id AS recipe_id, i.id AS ingredient_id, i.name AS name,
            i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ANY($1)
        ORDER BY ri.id
    ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(rows)
}

async fn list_member_recipes(
    table: &str,
    user_id: Id,
    recipe_ids: &[Id],
    pool: &Pool<Postgres>,
) -> Result<HashSet<Id>, potion::Error> {
    let rows: Vec<(Id,)> = sqlx::query_as(&format!(
        "SELECT recipe_id FROM {table} WHERE user_id = $1 AND recipe_id = ANY($2)"
    ))
    .bind(user_id)
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(rows.into_iter().map(|row| row.0).collect())
}

/// Joins tags, ingredient lines, authors and membership flags onto `recipes`.
async fn assemble_recipe_views(
    session: Option<&SessionData>,
    recipes: Vec<Recipe>,
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipeView>, potion::Error> {
    if recipes.is_empty() {
        return Ok(vec![]);
    }

    let recipe_ids: Vec<Id> = recipes.iter().map(|recipe| recipe.id).collect();
    let author_ids: Vec<Id> = recipes
        .iter()
        .map(|recipe| recipe.author_id)
        .collect::<HashSet<Id>>()
        .into_iter()
        .collect();

    let mut tags: HashMap<Id, Vec<Tag>> = HashMap::new();
    list_recipe_tags(&recipe_ids, pool)
        .await?
        .into_iter()
        .for_each(|tag| tags.entry(tag.recipe_id).or_default().push(tag.into()));

    let mut parts: HashMap<Id, Vec<RecipePart>> = HashMap::new();
    list_recipe_parts(&recipe_ids, pool)
        .await?
        .into_iter()
        .for_each(|part| parts.entry(part.recipe_id).or_default().push(part));

    let authors: HashMap<Id, User> = list_users_by_id(&author_ids, pool)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let (subscribed, favorites, cart) = match session {
        Some(session) => (
            subscribed_author_ids(session.user_id, pool).await?,
            list_member_recipes("favorites", session.user_id, &recipe_ids, pool).await?,
            list_member_recipes("shopping_cart", session.user_id, &recipe_ids, pool).await?,
        ),
        None => (HashSet::new(), HashSet::new(), HashSet::new()),
    };

    Ok(recipes
        .into_iter()
        .filter_map(|recipe| {
            let Some(author) = authors.get(&recipe.author_id) else {
                log::error!("> Recipe {} has no author row", recipe.id);
                return None;
            };
            let author = user_view(author, subscribed.contains(&author.id));
            let flags = RecipeFlags {
                is_favorited: favorites.contains(&recipe.id),
                is_in_shopping_cart: cart.contains(&recipe.id),
            };
            let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
            let recipe_parts = parts.remove(&recipe.id).unwrap_or_default();

            Some(recipe_view(recipe, author, recipe_tags, recipe_parts, flags))
        })
        .collect())
}

pub async fn fetch_recipe(
    session: Option<&SessionData>,
    id: Id,
    pool: &Pool<Postgres>,
) -> Result<RecipeView, potion::Error> {
    let recipe = find_recipe(id, pool).await?;

    assemble_recipe_views(session, vec![recipe], pool)
        .await?
        .pop()
        .ok_or_else(|| RecipeError::not_found("No recipe exists with specified id").into())
}

/// Newest first. Membership filters yield nothing for anonymous callers.
pub async fn fetch_recipes(
    session: Option<&SessionData>,
    filter: &RecipeFilter,
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipeView>, potion::Error> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT r.* FROM recipes r WHERE TRUE");

    if let Some(author) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt INNER JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug = ANY(",
            )
            .push_bind(filter.tags.clone())
            .push("))");
    }

    for (enabled, table) in [
        (filter.is_favorited, "favorites"),
        (filter.is_in_shopping_cart, "shopping_cart"),
    ] {
        if !enabled {
            continue;
        }
        let Some(session) = session else {
            return Ok(vec![]);
        };
        query
            .push(format!(
                " AND EXISTS (SELECT 1 FROM {table} m WHERE m.recipe_id = r.id AND m.user_id = "
            ))
            .push_bind(session.user_id)
            .push(")");
    }

    query.push(" ORDER BY r.id DESC");

    let rows: Vec<Recipe> = query
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    assemble_recipe_views(session, rows, pool).await
}

/// Database-backed checks: every referenced tag and ingredient must exist.
async fn validate_references(form: &RecipeForm, pool: &Pool<Postgres>) -> Result<(), potion::Error> {
    let tag_ids = form.tags.to_owned();
    let found = existing_tag_ids(&tag_ids, pool).await?;
    ensure_all_exist(&tag_ids, &found, "nonexistent tag")?;

    let ingredient_ids: Vec<Id> = form.ingredients.iter().map(|item| item.id).collect();
    let found = existing_ingredient_ids(&ingredient_ids, pool).await?;
    ensure_all_exist(&ingredient_ids, &found, "nonexistent ingredient")?;

    Ok(())
}

/// Inserts tag links and ingredient lines of `form` for `recipe_id`.
async fn insert_recipe_links(
    tr: &mut Transaction<'_, Postgres>,
    recipe_id: Id,
    form: &RecipeForm,
) -> Result<(), potion::Error> {
    let mut tags: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
    tags.push_values(form.tags.iter(), |mut b, tag_id| {
        b.push_bind(recipe_id).push_bind(*tag_id);
    });
    tags.build()
        .execute(&mut **tr)
        .await
        .map_err(RecipeError::from)?;

    let mut ingredients: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
    ingredients.push_values(form.ingredients.iter(), |mut b, item| {
        b.push_bind(recipe_id)
            .push_bind(item.id)
            .push_bind(item.amount);
    });
    ingredients
        .build()
        .execute(&mut **tr)
        .await
        .map_err(RecipeError::from)?;

    Ok(())
}

/// Inserts the recipe row and its links in one transaction.
async fn insert_recipe(
    author_id: Id,
    image: &str,
    form: &RecipeForm,
    pool: &Pool<Postgres>,
) -> Result<Id, potion::Error> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    let id: (Id,) = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, name, image, text, cooking_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
    ",
    )
    .bind(author_id)
    .bind(&form.name)
    .bind(image)
    .bind(&form.text)
    .bind(form.cooking_time)
    .fetch_one(&mut *tr)
    .await
    .map_err(RecipeError::from)?;

    insert_recipe_links(&mut tr, id.0, form).await?;

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    Ok(id.0)
}

/// Rewrites the recipe row and replaces its links in one transaction.
async fn replace_recipe(
    id: Id,
    image: &str,
    form: &RecipeForm,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    sqlx::query("UPDATE recipes SET name = $1, image = $2, text = $3, cooking_time = $4 WHERE id = $5")
        .bind(&form.name)
        .bind(image)
        .bind(&form.text)
        .bind(form.cooking_time)
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(RecipeError::from)?;

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    insert_recipe_links(&mut tr, id, form).await?;

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    Ok(())
}

/// The stored image is removed again when the recipe rows cannot be written.
pub async fn create_recipe(
    session: &SessionData,
    form: RecipeForm,
    images: &ImageStore,
    pool: &Pool<Postgres>,
) -> Result<RecipeView, potion::Error> {
    session.authenticate(ActionType::ManageOwnRecipes)?;
    validate_recipe(&form)?;
    let image = match &form.image {
        Some(data) => decode_image(data)?,
        None => return Err(RecipeError::invalid("image is required").into()),
    };
    validate_references(&form, pool).await?;

    let url = images.save(image).await?;
    let id = match insert_recipe(session.user_id, &url, &form, pool).await {
        Ok(id) => id,
        Err(e) => {
            images.discard(&url).await;
            return Err(e);
        }
    };

    log::info!("> User {} created recipe {id}", session.user_id);

    fetch_recipe(Some(session), id, pool).await
}

/// Replaces scalar fields, tags and ingredient lines wholesale. A replaced
/// image is removed once the new rows are committed.
pub async fn update_recipe(
    session: &SessionData,
    id: Id,
    form: RecipeForm,
    images: &ImageStore,
    pool: &Pool<Postgres>,
) -> Result<RecipeView, potion::Error> {
    let recipe = find_recipe(id, pool).await?;
    session.authenticate_author(recipe.author_id)?;
    validate_recipe(&form)?;
    let image = match &form.image {
        Some(data) => Some(decode_image(data)?),
        None => None,
    };
    validate_references(&form, pool).await?;

    let stored = match image {
        Some(image) => Some(images.save(image).await?),
        None => None,
    };
    let url = stored.as_deref().unwrap_or(&recipe.image);

    if let Err(e) = replace_recipe(id, url, &form, pool).await {
        if let Some(url) = &stored {
            images.discard(url).await;
        }
        return Err(e);
    }

    if stored.is_some() {
        images.discard(&recipe.image).await;
    }

    fetch_recipe(Some(session), id, pool).await
}

pub async fn delete_recipe(
    session: &SessionData,
    id: Id,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    let recipe = find_recipe(id, pool).await?;
    session.authenticate_author(recipe.author_id)?;

    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    log::info!("> User {} deleted recipe {id}", session.user_id);

    Ok(())
}
