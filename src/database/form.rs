use std::str::FromStr;

use serde::Deserialize;

use super::{error::TypeError, schema::Id};

/// Raw query string pairs, repeated keys included.
pub type QueryData = Vec<(String, String)>;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: Id,
    pub amount: i32,
}

/// Body of recipe create and update requests.
#[derive(Deserialize, Debug, Clone)]
pub struct RecipeForm {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<Id>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SetPasswordForm {
    pub new_password: String,
    pub current_password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TagForm {
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IngredientForm {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct SubscriptionQuery {
    pub recipes_limit: Option<usize>,
}

/// Filters accepted by the recipe listing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<Id>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl TryFrom<QueryData> for RecipeFilter {
    type Error = TypeError;

    fn try_from(value: QueryData) -> Result<Self, Self::Error> {
        let mut filter = Self::default();

        for (key, value) in value {
            match key.as_str() {
                "author" => filter.author = Some(parse_number(&value)?),
                "tags" => filter.tags.push(value),
                "is_favorited" => filter.is_favorited = parse_flag(&value)?,
                "is_in_shopping_cart" => filter.is_in_shopping_cart = parse_flag(&value)?,
                _ => {}
            }
        }

        Ok(filter)
    }
}

fn parse_number<T>(value: &str) -> Result<T, TypeError>
where
    T: FromStr,
{
    value
        .parse()
        .map_err(|_e| TypeError::new("Invalid type conversion"))
}

fn parse_flag(value: &str) -> Result<bool, TypeError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(TypeError::new("Invalid flag; expected 0 or 1")),
    }
}
