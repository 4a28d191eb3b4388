//! Database-backed; run with `DATABASE_URL` set and `cargo test -- --ignored`.

mod common;

use common::{count_rows, err, ingredient, ok, recipe, tag, user};
use foodgram::actions;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn favorite_toggle_rejects_duplicates(pool: PgPool) {
    let author = user(&pool, "author").await;
    let reader = user(&pool, "reader").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &author, "Soup", &[(salt, 5)], &[lunch]).await;

    let short = ok(actions::add_to_favorites(&reader, soup.id, &pool).await);
    assert_eq!(short.id, soup.id);
    assert_eq!(short.name, "Soup");

    let (status, info) = err(actions::add_to_favorites(&reader, soup.id, &pool).await);
    assert_eq!(status, 400);
    assert_eq!(info, "Recipe is already in favorites");
    let favorites = count_rows(
        &pool,
        &format!("SELECT COUNT(*) FROM favorites WHERE recipe_id = {}", soup.id),
    )
    .await;
    assert_eq!(favorites, 1);

    ok(actions::remove_from_favorites(&reader, soup.id, &pool).await);

    let (status, info) = err(actions::remove_from_favorites(&reader, soup.id, &pool).await);
    assert_eq!(status, 400);
    assert_eq!(info, "Recipe is not in favorites");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn toggles_on_missing_recipe_are_not_found(pool: PgPool) {
    let reader = user(&pool, "reader").await;

    let (status, _) = err(actions::add_to_shopping_cart(&reader, 404, &pool).await);
    assert_eq!(status, 404);

    let (status, _) = err(actions::remove_from_shopping_cart(&reader, 404, &pool).await);
    assert_eq!(status, 404);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn favorites_and_cart_are_independent(pool: PgPool) {
    let author = user(&pool, "author").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &author, "Soup", &[(salt, 5)], &[lunch]).await;

    ok(actions::add_to_favorites(&author, soup.id, &pool).await);
    ok(actions::add_to_shopping_cart(&author, soup.id, &pool).await);

    let view = ok(actions::fetch_recipe(Some(&author), soup.id, &pool).await);
    assert!(view.is_favorited);
    assert!(view.is_in_shopping_cart);

    ok(actions::remove_from_favorites(&author, soup.id, &pool).await);

    let view = ok(actions::fetch_recipe(Some(&author), soup.id, &pool).await);
    assert!(!view.is_favorited);
    assert!(view.is_in_shopping_cart);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn concurrent_adds_yield_one_conflict(pool: PgPool) {
    let author = user(&pool, "author").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    let soup = recipe(&pool, &author, "Soup", &[(salt, 5)], &[lunch]).await;

    let (first, second) = tokio::join!(
        actions::add_to_shopping_cart(&author, soup.id, &pool),
        actions::add_to_shopping_cart(&author, soup.id, &pool),
    );

    let failures: Vec<(u16, String)> = [first.map(|_| ()), second.map(|_| ())]
        .into_iter()
        .filter(|result| result.is_err())
        .map(err)
        .collect();

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0], (400, String::from("Recipe is already in shopping cart")));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn subscriptions_reject_self_and_duplicates(pool: PgPool) {
    let author = user(&pool, "author").await;
    let reader = user(&pool, "reader").await;

    let (status, info) = err(actions::subscribe(&author, author.user_id, None, &pool).await);
    assert_eq!(status, 400);
    assert_eq!(info, "You cannot follow yourself");

    let view = ok(actions::subscribe(&reader, author.user_id, None, &pool).await);
    assert_eq!(view.author.id, author.user_id);
    assert!(view.author.is_subscribed);
    assert_eq!(view.recipes_count, 0);

    let (status, _) = err(actions::subscribe(&reader, author.user_id, None, &pool).await);
    assert_eq!(status, 400);

    ok(actions::unsubscribe(&reader, author.user_id, &pool).await);

    let (status, info) = err(actions::unsubscribe(&reader, author.user_id, &pool).await);
    assert_eq!(status, 400);
    assert_eq!(info, "You are not subscribed to this author");

    let (status, _) = err(actions::subscribe(&reader, 9999, None, &pool).await);
    assert_eq!(status, 404);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn subscriptions_listing_truncates_recipes(pool: PgPool) {
    let author = user(&pool, "author").await;
    let reader = user(&pool, "reader").await;
    let salt = ingredient(&pool, "Salt", "g").await;
    let lunch = tag(&pool, "lunch", "#49B64E").await;
    for name in ["Soup", "Stew", "Salad"] {
        recipe(&pool, &author, name, &[(salt, 5)], &[lunch]).await;
    }

    ok(actions::subscribe(&reader, author.user_id, None, &pool).await);

    let listing = ok(actions::fetch_subscriptions(&reader, Some(2), &pool).await);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].recipes_count, 3);
    let names: Vec<&str> = listing[0].recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Salad", "Stew"]);

    let user_view = ok(actions::fetch_user(Some(&reader), author.user_id, &pool).await);
    assert!(user_view.is_subscribed);
    let user_view = ok(actions::fetch_user(None, author.user_id, &pool).await);
    assert!(!user_view.is_subscribed);
}
