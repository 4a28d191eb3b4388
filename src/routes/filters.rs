use warp::{filters::BoxedFilter, reply::Response, Filter, Reply};

use crate::{
    constants::{API_PREFIX, MAX_BODY_SIZE},
    form::{IngredientQuery, QueryData, SubscriptionQuery},
    middleware::{with_possible_session, with_session},
    schema::Id,
};

use super::{
    context::{with_context, Context},
    handlers,
    reply::handle_rejection,
};

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_SIZE).and(warp::body::json())
}

fn recipe_routes(ctx: &Context) -> BoxedFilter<(Response,)> {
    let session = with_session(ctx.secret.clone());
    let possible_session = with_possible_session(ctx.secret.clone());

    let list = warp::path!("recipes")
        .and(warp::get())
        .and(possible_session.clone())
        .and(warp::query::<QueryData>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_recipes);

    let create = warp::path!("recipes")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::create_recipe);

    let download = warp::path!("recipes" / "download_shopping_cart")
        .and(warp::get())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::download_shopping_cart);

    let get = warp::path!("recipes" / Id)
        .and(warp::get())
        .and(possible_session)
        .and(with_context(ctx.clone()))
        .and_then(handlers::get_recipe);

    let update = warp::path!("recipes" / Id)
        .and(warp::patch())
        .and(session.clone())
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::update_recipe);

    let delete = warp::path!("recipes" / Id)
        .and(warp::delete())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::delete_recipe);

    let favorite = warp::path!("recipes" / Id / "favorite")
        .and(warp::post())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::add_favorite);

    let unfavorite = warp::path!("recipes" / Id / "favorite")
        .and(warp::delete())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::remove_favorite);

    let add_to_cart = warp::path!("recipes" / Id / "shopping_cart")
        .and(warp::post())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::add_to_cart);

    let remove_from_cart = warp::path!("recipes" / Id / "shopping_cart")
        .and(warp::delete())
        .and(session)
        .and(with_context(ctx.clone()))
        .and_then(handlers::remove_from_cart);

    list.or(create)
        .unify()
        .or(download)
        .unify()
        .or(get)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
        .or(favorite)
        .unify()
        .or(unfavorite)
        .unify()
        .or(add_to_cart)
        .unify()
        .or(remove_from_cart)
        .unify()
        .boxed()
}

fn catalogue_routes(ctx: &Context) -> BoxedFilter<(Response,)> {
    let session = with_session(ctx.secret.clone());

    let list_tags = warp::path!("tags")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_tags);

    let get_tag = warp::path!("tags" / Id)
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::get_tag);

    let create_tag = warp::path!("tags")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::create_tag);

    let list_ingredients = warp::path!("ingredients")
        .and(warp::get())
        .and(warp::query::<IngredientQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_ingredients);

    let get_ingredient = warp::path!("ingredients" / Id)
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::get_ingredient);

    let create_ingredient = warp::path!("ingredients")
        .and(warp::post())
        .and(session)
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::create_ingredient);

    list_tags
        .or(get_tag)
        .unify()
        .or(create_tag)
        .unify()
        .or(list_ingredients)
        .unify()
        .or(get_ingredient)
        .unify()
        .or(create_ingredient)
        .unify()
        .boxed()
}

fn user_routes(ctx: &Context) -> BoxedFilter<(Response,)> {
    let session = with_session(ctx.secret.clone());
    let possible_session = with_possible_session(ctx.secret.clone());

    let list = warp::path!("users")
        .and(warp::get())
        .and(possible_session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_users);

    let register = warp::path!("users")
        .and(warp::post())
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::register);

    let me = warp::path!("users" / "me")
        .and(warp::get())
        .and(session.clone())
        .and(with_context(ctx.clone()))
        .and_then(handlers::me);

    let set_password = warp::path!("users" / "set_password")
        .and(warp::post())
        .and(session.clone())
        .and(json_body())
        .and(with_context(ctx.clone()))
        .and_then(handlers::set_password);

    let subscriptions = warp::path!("users" / "subscriptions")
        .and(warp::get())
        .and(session.clone())
        .and(warp::query::<SubscriptionQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_subscriptions);

    let get = warp::path!("users" / Id)
        .and(warp::get())
        .and(possible_session)
        .and(with_context(ctx.clone()))
        .and_then(handlers::get_user);

    let subscribe = warp::path!("users" / Id / "subscribe")
        .and(warp::post())
        .and(session.clone())
        .and(warp::query::<SubscriptionQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::subscribe);

    let unsubscribe = warp::path!("users" / Id / "subscribe")
        .and(warp::delete())
        .and(session)
        .and(with_context(ctx.clone()))
        .and_then(handlers::unsubscribe);

    list.or(register)
        .unify()
        .or(me)
        .unify()
        .or(set_password)
        .unify()
        .or(subscriptions)
        .unify()
        .or(get)
        .unify()
        .or(subscribe)
        .unify()
        .or(unsubscribe)
        .unify()
        .boxed()
}

/// Every endpoint under `/api/`, with rejections rendered as JSON errors and request logging.
pub fn routes(
    ctx: Context,
) -> impl Filter<Extract = (impl Reply,), Error = std::convert::Infallible> + Clone {
    warp::path(API_PREFIX)
        .and(
            recipe_routes(&ctx)
                .or(catalogue_routes(&ctx))
                .unify()
                .or(user_routes(&ctx))
                .unify(),
        )
        .recover(handle_rejection)
        .unify()
        .with(warp::log("foodgram"))
}
