use std::fmt::{self, Display};

use potion::HtmlError;
use thiserror::Error;

/// Failure reported by the database driver that has no domain meaning.
#[derive(Debug)]
pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(e),
            sqlx::Error::RowNotFound => Self::new(String::from("RowNotFound")),
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(e),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(String::from("Unknown error")),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for potion::Error {
    fn from(value: QueryError) -> Self {
        log::error!("> Query failed: {}", value.info);
        potion::Error {
            code: 500,
            info: Some(value.info),
            redirect: None,
        }
    }
}

/// Errors raised by recipe, catalogue and user operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A unique row already exists.
    #[error("{0}")]
    Conflict(String),
    /// Input failed validation.
    #[error("{0}")]
    InvalidArgument(String),
    /// A toggle row expected by a removal is missing.
    #[error("{0}")]
    NotPresent(String),
    /// The shopping cart holds no entries.
    #[error("{0}")]
    EmptyCollection(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Storage(QueryError),
    #[error("media storage failed: {0}")]
    Media(#[from] std::io::Error),
}

impl RecipeError {
    pub fn not_found(info: &str) -> Self {
        Self::NotFound(info.to_owned())
    }

    pub fn conflict(info: &str) -> Self {
        Self::Conflict(info.to_owned())
    }

    pub fn invalid(info: impl Into<String>) -> Self {
        Self::InvalidArgument(info.into())
    }

    pub fn not_present(info: &str) -> Self {
        Self::NotPresent(info.to_owned())
    }

    /// HTTP status the error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_)
            | Self::InvalidArgument(_)
            | Self::NotPresent(_)
            | Self::EmptyCollection(_) => 400,
            Self::Forbidden(_) => 403,
            Self::Unauthorized(_) => 401,
            Self::Storage(_) | Self::Media(_) => 500,
        }
    }
}

impl From<sqlx::Error> for RecipeError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(e) = &value {
            if e.is_unique_violation() {
                return Self::conflict("Entry already exists");
            }
            if e.is_foreign_key_violation() {
                return Self::not_found("Referenced entry does not exist");
            }
            if e.is_check_violation() {
                return Self::invalid(e.message());
            }
        }
        Self::Storage(QueryError::from(value))
    }
}

impl From<RecipeError> for potion::Error {
    fn from(value: RecipeError) -> Self {
        match value {
            RecipeError::Storage(e) => e.into(),
            RecipeError::Media(e) => {
                log::error!("> Failed to store media: {e}");
                potion::Error {
                    code: 500,
                    info: Some(String::from("Could not store image")),
                    redirect: None,
                }
            }
            other => potion::Error {
                code: other.status().into(),
                info: Some(other.to_string()),
                redirect: None,
            },
        }
    }
}

/// Raised when converting loosely typed input such as query parameters.
#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl From<TypeError> for potion::Error {
    fn from(value: TypeError) -> Self {
        HtmlError::InvalidRequest.new(&value.info)
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}
