//! JSON read shapes. One function per (operation, entity) pair.

use serde::Serialize;

use super::schema::{Id, Recipe, RecipeFlags, RecipePart, Tag, User};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub email: String,
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeShortView {
    pub id: Id,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientLineView {
    pub id: Id,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize, Debug, Clone)]
pub struct RecipeView {
    pub id: Id,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<IngredientLineView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// An author the current user follows, with a slice of their recipes.
#[derive(Serialize, Debug, Clone)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeShortView>,
    pub recipes_count: usize,
}

pub fn user_view(user: &User, is_subscribed: bool) -> UserView {
    UserView {
        email: user.email.to_owned(),
        id: user.id,
        username: user.username.to_owned(),
        first_name: user.first_name.to_owned(),
        last_name: user.last_name.to_owned(),
        is_subscribed,
    }
}

pub fn recipe_short_view(recipe: &Recipe) -> RecipeShortView {
    RecipeShortView {
        id: recipe.id,
        name: recipe.name.to_owned(),
        image: recipe.image.to_owned(),
        cooking_time: recipe.cooking_time,
    }
}

pub fn recipe_view(
    recipe: Recipe,
    author: UserView,
    tags: Vec<Tag>,
    parts: Vec<RecipePart>,
    flags: RecipeFlags,
) -> RecipeView {
    RecipeView {
        id: recipe.id,
        tags,
        author,
        ingredients: parts
            .into_iter()
            .map(|part| IngredientLineView {
                id: part.ingredient_id,
                name: part.name,
                measurement_unit: part.measurement_unit,
                amount: part.amount,
            })
            .collect(),
        is_favorited: flags.is_favorited,
        is_in_shopping_cart: flags.is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    }
}

/// `recipes` is expected newest first; only the first `recipes_limit` are
/// embedded while `recipes_count` reports all of them. A limit of zero
/// embeds everything.
pub fn subscription_view(
    author: &User,
    recipes: &[Recipe],
    recipes_limit: Option<usize>,
) -> SubscriptionView {
    let limit = recipes_limit
        .filter(|limit| *limit > 0)
        .unwrap_or(recipes.len());

    SubscriptionView {
        author: user_view(author, true),
        recipes: recipes.iter().take(limit).map(recipe_short_view).collect(),
        recipes_count: recipes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UserRole;
    use rstest::rstest;

    fn author() -> User {
        User {
            id: 7,
            email: String::from("chef@example.com"),
            username: String::from("chef"),
            first_name: String::from("Julia"),
            last_name: String::from("Child"),
            password: String::new(),
            role: UserRole::User,
        }
    }

    fn recipe(id: Id) -> Recipe {
        Recipe {
            id,
            author_id: 7,
            name: format!("Recipe {id}"),
            image: format!("/media/recipes/images/{id}.png"),
            text: String::from("Cook it."),
            cooking_time: 15,
        }
    }

    #[test]
    fn subscription_truncates_recipes_but_counts_all() {
        let recipes: Vec<Recipe> = (1..=5).rev().map(recipe).collect();

        let view = subscription_view(&author(), &recipes, Some(2));

        assert_eq!(view.recipes_count, 5);
        let ids: Vec<Id> = view.recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4]);
        assert!(view.author.is_subscribed);
    }

    #[test]
    fn subscription_without_limit_embeds_everything() {
        let recipes: Vec<Recipe> = (1..=3).map(recipe).collect();

        let view = subscription_view(&author(), &recipes, None);

        assert_eq!(view.recipes.len(), 3);
    }

    #[test]
    fn subscription_flattens_author_fields() {
        let view = subscription_view(&author(), &[recipe(1)], None);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["username"], "chef");
        assert_eq!(value["recipes_count"], 1);
        assert_eq!(value["recipes"][0]["id"], 1);
    }

    #[rstest]
    #[case(None, 3)]
    #[case(Some(0), 3)]
    #[case(Some(2), 2)]
    #[case(Some(10), 3)]
    fn recipes_limit_truncates_only_when_positive(
        #[case] recipes_limit: Option<usize>,
        #[case] embedded: usize,
    ) {
        let recipes = [recipe(3), recipe(2), recipe(1)];

        let view = subscription_view(&author(), &recipes, recipes_limit);

        assert_eq!(view.recipes.len(), embedded);
        assert_eq!(view.recipes_count, 3);
    }

    #[test]
    fn recipe_view_embeds_lines_by_ingredient_id() {
        let parts = vec![RecipePart {
            recipe_id: 1,
            ingredient_id: 11,
            name: String::from("Salt"),
            measurement_unit: String::from("g"),
            amount: 5,
        }];
        let flags = RecipeFlags {
            is_favorited: true,
            is_in_shopping_cart: false,
        };

        let view = recipe_view(recipe(1), user_view(&author(), false), vec![], parts, flags);

        assert_eq!(view.ingredients[0].id, 11);
        assert_eq!(view.ingredients[0].amount, 5);
        assert!(view.is_favorited);
        assert!(!view.is_in_shopping_cart);
        assert_eq!(view.author.username, "chef");
    }

    #[test]
    fn short_view_has_four_fields() {
        let value = serde_json::to_value(recipe_short_view(&recipe(3))).unwrap();

        assert_eq!(value.as_object().map(|o| o.len()), Some(4));
        assert_eq!(value["cooking_time"], 15);
    }
}
