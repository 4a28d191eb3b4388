//! Database-backed; run with `DATABASE_URL` set and `cargo test -- --ignored`.

mod common;

use common::{err, ingredient, ok, recipe, tag, user};
use foodgram::actions;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn shared_ingredients_are_summed(pool: PgPool) {
    let cook = user(&pool, "cook").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let water = ingredient(&pool, "Water", "ml").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &cook, "Soup", &[(salt, 5), (water, 300)], &[lunch]).await;
    let stew = recipe(&pool, &cook, "Stew", &[(salt, 10)], &[lunch]).await;

    ok(actions::add_to_shopping_cart(&cook, soup.id, &pool).await);
    ok(actions::add_to_shopping_cart(&cook, stew.id, &pool).await);

    let (file_name, content) = ok(actions::download_shopping_cart(&cook, &pool).await);

    assert_eq!(file_name, "cook_shopping_cart.txt");
    assert_eq!(
        content,
        "Shopping list for cook:\n\nSalt - 15/g\nWater - 300/ml"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn empty_cart_cannot_be_downloaded(pool: PgPool) {
    let cook = user(&pool, "cook").await;

    let (status, info) = err(actions::download_shopping_cart(&cook, &pool).await);

    assert_eq!(status, 400);
    assert_eq!(info, "Shopping cart is empty");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn other_users_carts_are_ignored(pool: PgPool) {
    let cook = user(&pool, "cook").await;
    let guest = user(&pool, "guest").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &cook, "Soup", &[(salt, 5)], &[lunch]).await;

    ok(actions::add_to_shopping_cart(&cook, soup.id, &pool).await);
    ok(actions::add_to_shopping_cart(&guest, soup.id, &pool).await);

    let (_, content) = ok(actions::download_shopping_cart(&guest, &pool).await);

    assert_eq!(content, "Shopping list for guest:\n\nSalt - 5/g");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn download_names_file_after_stored_username(pool: PgPool) {
    let cook = user(&pool, "cook").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &cook, "Soup", &[(salt, 5)], &[lunch]).await;
    ok(actions::add_to_shopping_cart(&cook, soup.id, &pool).await);

    let mut forged = cook.clone();
    forged.username = String::from("x\"\r\nSet-Cookie: y");
    let (file_name, content) = ok(actions::download_shopping_cart(&forged, &pool).await);

    assert_eq!(file_name, "cook_shopping_cart.txt");
    assert!(content.starts_with("Shopping list for cook:"));
}
