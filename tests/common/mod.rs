#![allow(dead_code)]

use foodgram::{
    actions,
    form::{IngredientAmount, IngredientForm, RecipeForm, RegisterForm, TagForm},
    images::ImageStore,
    jwt::SessionData,
    schema::{Id, UserRole},
    views::RecipeView,
};
use sqlx::PgPool;

// 1x1 transparent PNG
pub const IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn ok<T>(result: Result<T, potion::Error>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("unexpected error {:?}", e.info),
    }
}

pub fn err<T>(result: Result<T, potion::Error>) -> (u16, String) {
    match result {
        Ok(_) => panic!("expected an error"),
        Err(e) => (
            u16::try_from(e.code).unwrap_or(500),
            e.info.unwrap_or_default(),
        ),
    }
}

pub fn admin() -> SessionData {
    SessionData {
        user_id: 0,
        username: String::from("admin"),
        role: UserRole::Admin,
    }
}

pub fn image_store() -> ImageStore {
    let root = std::env::temp_dir().join(format!("foodgram-{}", uuid::Uuid::new_v4()));
    ImageStore::new(root, "/media")
}

pub async fn user(pool: &PgPool, username: &str) -> SessionData {
    let view = ok(actions::register_user(
        RegisterForm {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: String::from("Test"),
            last_name: String::from("User"),
            password: String::from("correct horse battery"),
        },
        pool,
    )
    .await);

    SessionData {
        user_id: view.id,
        username: view.username,
        role: UserRole::User,
    }
}

pub async fn tag(pool: &PgPool, slug: &str, color: &str) -> Id {
    ok(actions::create_tag(
        &admin(),
        TagForm {
            name: slug.to_uppercase(),
            slug: slug.to_owned(),
            color: color.to_owned(),
        },
        pool,
    )
    .await)
    .id
}

pub async fn ingredient(pool: &PgPool, name: &str, unit: &str) -> Id {
    ok(actions::create_ingredient(
        &admin(),
        IngredientForm {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        },
        pool,
    )
    .await)
    .id
}

pub fn recipe_form(name: &str, ingredients: &[(Id, i32)], tags: &[Id]) -> RecipeForm {
    RecipeForm {
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientAmount {
                id: *id,
                amount: *amount,
            })
            .collect(),
        tags: tags.to_vec(),
        image: Some(IMAGE.to_owned()),
        name: name.to_owned(),
        text: String::from("Mix everything."),
        cooking_time: 15,
    }
}

pub async fn recipe(
    pool: &PgPool,
    author: &SessionData,
    name: &str,
    ingredients: &[(Id, i32)],
    tags: &[Id],
) -> RecipeView {
    ok(actions::create_recipe(
        author,
        recipe_form(name, ingredients, tags),
        &image_store(),
        pool,
    )
    .await)
}

pub async fn count_rows(pool: &PgPool, query: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(query).fetch_one(pool).await.unwrap();
    row.0
}
