//! Input checks run before any recipe, tag, ingredient or user row is written.

use std::collections::HashSet;

use crate::constants::{
    MAX_COLOR_LENGTH, MAX_EMAIL_LENGTH, MAX_FIELD_LENGTH, MAX_NAME_LENGTH, MAX_VALUE, MIN_VALUE,
    USER_ME,
};

use super::{
    error::RecipeError,
    form::{IngredientAmount, IngredientForm, RecipeForm, RegisterForm, TagForm},
    schema::Id,
};

/// Runs every check on a recipe body that does not need the database.
pub fn validate_recipe(form: &RecipeForm) -> Result<(), RecipeError> {
    validate(form)?;
    validate_tags(&form.tags)?;
    validate_ingredients(&form.ingredients)?;
    validate_cooking_time(form.cooking_time)?;
    validate_text_field("name", &form.name, MAX_FIELD_LENGTH)?;
    if form.text.trim().is_empty() {
        return Err(RecipeError::invalid("text must not be blank"));
    }

    Ok(())
}

/// A recipe needs at least one ingredient and one tag.
pub fn validate(form: &RecipeForm) -> Result<(), RecipeError> {
    if form.ingredients.is_empty() {
        return Err(RecipeError::invalid(
            "recipe must contain at least one ingredient",
        ));
    }
    if form.tags.is_empty() {
        return Err(RecipeError::invalid("recipe must contain at least one tag"));
    }

    Ok(())
}

pub fn validate_tags(tags: &[Id]) -> Result<(), RecipeError> {
    if !all_unique(tags.iter()) {
        return Err(RecipeError::invalid("tags must be unique"));
    }

    Ok(())
}

pub fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), RecipeError> {
    if !all_unique(ingredients.iter().map(|item| &item.id)) {
        return Err(RecipeError::invalid("ingredients must be unique"));
    }

    for item in ingredients {
        if !(MIN_VALUE..=MAX_VALUE).contains(&item.amount) {
            return Err(RecipeError::invalid(format!(
                "amount must be between {MIN_VALUE} and {MAX_VALUE}"
            )));
        }
    }

    Ok(())
}

pub fn validate_cooking_time(cooking_time: i32) -> Result<(), RecipeError> {
    if !(MIN_VALUE..=MAX_VALUE).contains(&cooking_time) {
        return Err(RecipeError::invalid(format!(
            "cooking_time must be between {MIN_VALUE} and {MAX_VALUE}"
        )));
    }

    Ok(())
}

/// Fails with `info` when any requested id is missing from `found`.
pub fn ensure_all_exist(requested: &[Id], found: &[Id], info: &str) -> Result<(), RecipeError> {
    let found: HashSet<&Id> = found.iter().collect();
    match requested.iter().find(|id| !found.contains(id)) {
        Some(id) => Err(RecipeError::invalid(format!("{info} ({id})"))),
        None => Ok(()),
    }
}

/// Accepts `#RGB` and `#RRGGBB`.
pub fn validate_color(color: &str) -> Result<(), RecipeError> {
    let valid = match color.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == MAX_COLOR_LENGTH - 1)
                && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    };

    if !valid {
        return Err(RecipeError::invalid(
            "color must be a hex code in #RRGGBB or #RGB format",
        ));
    }

    Ok(())
}

/// Letters, digits and `@ . + - _` only; `me` is reserved.
pub fn validate_username(username: &str) -> Result<(), RecipeError> {
    validate_text_field("username", username, MAX_NAME_LENGTH)?;

    let invalid: Vec<char> = username
        .chars()
        .filter(|c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')))
        .collect();
    if !invalid.is_empty() {
        return Err(RecipeError::invalid(format!(
            "username contains invalid characters {invalid:?}"
        )));
    }

    if username.to_lowercase() == USER_ME {
        return Err(RecipeError::invalid(format!(
            "username <{USER_ME}> is reserved"
        )));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), RecipeError> {
    validate_text_field("email", email, MAX_EMAIL_LENGTH)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(RecipeError::invalid("email is not a valid address")),
    }
}

pub fn validate_registration(form: &RegisterForm) -> Result<(), RecipeError> {
    validate_email(&form.email)?;
    validate_username(&form.username)?;
    validate_text_field("first_name", &form.first_name, MAX_NAME_LENGTH)?;
    validate_text_field("last_name", &form.last_name, MAX_NAME_LENGTH)?;
    validate_password(&form.password)
}

pub fn validate_password(password: &str) -> Result<(), RecipeError> {
    if password.is_empty() {
        return Err(RecipeError::invalid("password must not be empty"));
    }
    if password.chars().count() > MAX_NAME_LENGTH {
        return Err(RecipeError::invalid(format!(
            "password must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

pub fn validate_tag(form: &TagForm) -> Result<(), RecipeError> {
    validate_text_field("name", &form.name, MAX_FIELD_LENGTH)?;
    validate_text_field("slug", &form.slug, MAX_FIELD_LENGTH)?;
    if !form
        .slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RecipeError::invalid("slug contains invalid characters"));
    }
    validate_color(&form.color)
}

pub fn validate_ingredient(form: &IngredientForm) -> Result<(), RecipeError> {
    validate_text_field("name", &form.name, MAX_FIELD_LENGTH)?;
    validate_text_field("measurement_unit", &form.measurement_unit, MAX_FIELD_LENGTH)
}

fn validate_text_field(field: &str, value: &str, max_length: usize) -> Result<(), RecipeError> {
    if value.trim().is_empty() {
        return Err(RecipeError::invalid(format!("{field} must not be blank")));
    }
    if value.chars().count() > max_length {
        return Err(RecipeError::invalid(format!(
            "{field} must be at most {max_length} characters"
        )));
    }

    Ok(())
}

fn all_unique<'a, T, I>(items: I) -> bool
where
    T: Eq + std::hash::Hash + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    items.into_iter().all(|item| seen.insert(item))
}
