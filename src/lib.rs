mod database {
    pub mod actions;
    pub mod error;
    pub mod form;
    pub mod schema;
    pub mod shopping_list;
    pub mod validation;
    pub mod views;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
    pub mod middleware;
    pub mod permissions;
}
mod media {
    pub mod images;
}
pub mod routes {
    pub mod context;
    pub mod filters;
    pub mod handlers;
    pub mod reply;
}
pub mod config;
mod constants;

pub use authentication::*;
pub use constants::*;
pub use database::*;
pub use media::*;
