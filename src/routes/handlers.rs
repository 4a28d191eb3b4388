use std::convert::Infallible;

use warp::{http::StatusCode, reply::Response};

use crate::{
    actions,
    form::{
        IngredientForm, IngredientQuery, QueryData, RecipeFilter, RecipeForm, RegisterForm,
        SetPasswordForm, SubscriptionQuery, TagForm,
    },
    jwt::SessionData,
    schema::Id,
};

use super::{
    context::Context,
    reply::{attachment, error_reply, json_reply, no_content},
};

pub async fn list_recipes(
    session: Option<SessionData>,
    query: QueryData,
    ctx: Context,
) -> Result<Response, Infallible> {
    let filter = match RecipeFilter::try_from(query) {
        Ok(filter) => filter,
        Err(e) => return Ok(error_reply(e.into())),
    };

    json_reply(
        actions::fetch_recipes(session.as_ref(), &filter, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn get_recipe(
    id: Id,
    session: Option<SessionData>,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::fetch_recipe(session.as_ref(), id, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn create_recipe(
    session: SessionData,
    form: RecipeForm,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::create_recipe(&session, form, &ctx.images, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn update_recipe(
    id: Id,
    session: SessionData,
    form: RecipeForm,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::update_recipe(&session, id, form, &ctx.images, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn delete_recipe(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    no_content(actions::delete_recipe(&session, id, &ctx.pool).await)
}

pub async fn add_favorite(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::add_to_favorites(&session, id, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn remove_favorite(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    no_content(actions::remove_from_favorites(&session, id, &ctx.pool).await)
}

pub async fn add_to_cart(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::add_to_shopping_cart(&session, id, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn remove_from_cart(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    no_content(actions::remove_from_shopping_cart(&session, id, &ctx.pool).await)
}

pub async fn download_shopping_cart(
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    attachment(actions::download_shopping_cart(&session, &ctx.pool).await)
}

pub async fn list_tags(ctx: Context) -> Result<Response, Infallible> {
    json_reply(actions::list_tags(&ctx.pool).await, StatusCode::OK)
}

pub async fn get_tag(id: Id, ctx: Context) -> Result<Response, Infallible> {
    json_reply(actions::fetch_tag(id, &ctx.pool).await, StatusCode::OK)
}

pub async fn create_tag(
    session: SessionData,
    form: TagForm,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::create_tag(&session, form, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn list_ingredients(
    query: IngredientQuery,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::list_ingredients(&query, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn get_ingredient(id: Id, ctx: Context) -> Result<Response, Infallible> {
    json_reply(actions::fetch_ingredient(id, &ctx.pool).await, StatusCode::OK)
}

pub async fn create_ingredient(
    session: SessionData,
    form: IngredientForm,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::create_ingredient(&session, form, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn list_users(
    session: Option<SessionData>,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::list_users(session.as_ref(), &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn get_user(
    id: Id,
    session: Option<SessionData>,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::fetch_user(session.as_ref(), id, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn me(session: SessionData, ctx: Context) -> Result<Response, Infallible> {
    json_reply(actions::fetch_me(&session, &ctx.pool).await, StatusCode::OK)
}

pub async fn register(form: RegisterForm, ctx: Context) -> Result<Response, Infallible> {
    json_reply(
        actions::register_user(form, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn set_password(
    session: SessionData,
    form: SetPasswordForm,
    ctx: Context,
) -> Result<Response, Infallible> {
    no_content(actions::set_password(&session, form, &ctx.pool).await)
}

pub async fn list_subscriptions(
    session: SessionData,
    query: SubscriptionQuery,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::fetch_subscriptions(&session, query.recipes_limit, &ctx.pool).await,
        StatusCode::OK,
    )
}

pub async fn subscribe(
    id: Id,
    session: SessionData,
    query: SubscriptionQuery,
    ctx: Context,
) -> Result<Response, Infallible> {
    json_reply(
        actions::subscribe(&session, id, query.recipes_limit, &ctx.pool).await,
        StatusCode::CREATED,
    )
}

pub async fn unsubscribe(
    id: Id,
    session: SessionData,
    ctx: Context,
) -> Result<Response, Infallible> {
    no_content(actions::unsubscribe(&session, id, &ctx.pool).await)
}
