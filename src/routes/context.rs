use std::{convert::Infallible, sync::Arc};

use sqlx::{Pool, Postgres};
use warp::Filter;

use crate::{config::Config, images::ImageStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct Context {
    pub pool: Pool<Postgres>,
    pub images: Arc<ImageStore>,
    pub secret: Arc<Vec<u8>>,
}

impl Context {
    pub fn new(pool: Pool<Postgres>, config: &Config) -> Self {
        Self {
            pool,
            images: Arc::new(ImageStore::new(
                config.media_root.to_owned(),
                &config.media_url,
            )),
            secret: Arc::new(config.jwt_secret.as_bytes().to_vec()),
        }
    }
}

pub fn with_context(ctx: Context) -> impl Filter<Extract = (Context,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}
