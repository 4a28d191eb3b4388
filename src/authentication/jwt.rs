use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::error::RecipeError;
use crate::schema::{Id, UserRole};

/// Claims carried by the bearer token the auth provider issues.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: Id,
    pub username: String,
    pub role: UserRole,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: Id, username: String, role: UserRole, lifetime: Duration) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + lifetime).timestamp();

        Self {
            user_id: id,
            username,
            role,
            iat,
            exp,
        }
    }
}

/// Identity of the caller, threaded explicitly through every action.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Id,
    pub username: String,
    pub role: UserRole,
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            user_id: value.user_id,
            username: value.username,
            role: value.role,
        }
    }
}

fn signing_key(secret: &[u8]) -> Result<Hmac<Sha256>, RecipeError> {
    Hmac::new_from_slice(secret)
        .map_err(|_| RecipeError::Unauthorized(String::from("Invalid session key")))
}

pub fn sign_jwt_session(claims: &JwtSessionData, secret: &[u8]) -> Result<String, RecipeError> {
    let key = signing_key(secret)?;

    claims
        .sign_with_key(&key)
        .map_err(|_| RecipeError::Unauthorized(String::from("Could not sign session")))
}

pub fn verify_jwt_session(token: &str, secret: &[u8]) -> Result<JwtSessionData, RecipeError> {
    let key = signing_key(secret)?;

    let session: JwtSessionData = token
        .verify_with_key(&key)
        .map_err(|_| RecipeError::Unauthorized(String::from("Invalid session; Invalid token")))?;

    let now = Local::now().timestamp();
    if (session.exp - now).is_negative() {
        return Err(RecipeError::Unauthorized(String::from(
            "Invalid session; Token expired",
        )));
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn signed_token_verifies() {
        let claims = JwtSessionData::new(4, String::from("cook"), UserRole::User, Duration::hours(1));
        let token = sign_jwt_session(&claims, SECRET).unwrap();

        let session: SessionData = verify_jwt_session(&token, SECRET).unwrap().into();

        assert_eq!(session.user_id, 4);
        assert_eq!(session.username, "cook");
        assert_eq!(session.role, UserRole::User);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = JwtSessionData::new(4, String::from("cook"), UserRole::User, Duration::hours(1));
        let token = sign_jwt_session(&claims, SECRET).unwrap();

        assert!(matches!(
            verify_jwt_session(&token, b"other-secret"),
            Err(RecipeError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = JwtSessionData::new(4, String::from("cook"), UserRole::User, Duration::hours(-1));
        let token = sign_jwt_session(&claims, SECRET).unwrap();

        assert!(verify_jwt_session(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_jwt_session("not.a.token", SECRET).is_err());
    }
}
