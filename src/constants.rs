pub const MIN_VALUE: i32 = 1;
pub const MAX_VALUE: i32 = 32000;

pub const MAX_FIELD_LENGTH: usize = 200;
pub const MAX_NAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_COLOR_LENGTH: usize = 7;

/// Reserved for the `/users/me/` route.
pub const USER_ME: &str = "me";

pub const SESSION_HEADER: &str = "authorization";
pub const SESSION_SCHEMES: &[&str] = &["Bearer", "Token"];

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_MEDIA_ROOT: &str = "media";
pub const DEFAULT_MEDIA_URL: &str = "/media";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Upper bound for JSON bodies; recipe images travel inline as base64.
pub const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024;
pub const API_PREFIX: &str = "api";
