use std::sync::Arc;

use warp::{
    reject::{self, Rejection},
    Filter,
};

use crate::constants::{SESSION_HEADER, SESSION_SCHEMES};

use super::jwt::{verify_jwt_session, SessionData};

#[derive(Debug)]
pub struct Unauthorized;

impl reject::Reject for Unauthorized {}

/// Extracts the token from `Bearer <token>` or `Token <token>`.
pub fn parse_authorization(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !SESSION_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn resolve_session(header: Option<String>, secret: &[u8]) -> Option<SessionData> {
    let header = header?;
    let token = parse_authorization(&header)?;

    match verify_jwt_session(token, secret) {
        Ok(data) => Some(data.into()),
        Err(e) => {
            log::trace!("> Rejected session: {e}");
            None
        }
    }
}

/// Requires a valid session; rejects with [`Unauthorized`] otherwise.
pub fn with_session(
    secret: Arc<Vec<u8>>,
) -> impl Filter<Extract = (SessionData,), Error = Rejection> + Clone {
    warp::header::optional::<String>(SESSION_HEADER).and_then(move |header: Option<String>| {
        let secret = secret.clone();
        async move {
            match resolve_session(header, &secret) {
                Some(session) => Ok(session),
                None => Err(reject::custom(Unauthorized)),
            }
        }
    })
}

/// Anonymous callers and invalid tokens both yield `None`.
pub fn with_possible_session(
    secret: Arc<Vec<u8>>,
) -> impl Filter<Extract = (Option<SessionData>,), Error = Rejection> + Clone {
    warp::header::optional::<String>(SESSION_HEADER)
        .map(move |header: Option<String>| resolve_session(header, &secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwt::{sign_jwt_session, JwtSessionData},
        schema::UserRole,
    };
    use chrono::Duration;
    use rstest::rstest;

    const SECRET: &[u8] = b"middleware-secret";

    fn token() -> String {
        let claims = JwtSessionData::new(3, String::from("baker"), UserRole::User, Duration::hours(1));
        sign_jwt_session(&claims, SECRET).unwrap()
    }

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("Token abc", Some("abc"))]
    #[case("bearer  abc ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("Bearer   ", None)]
    fn authorization_schemes(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_authorization(header), expected);
    }

    #[tokio::test]
    async fn session_is_extracted_from_header() {
        let filter = with_session(Arc::new(SECRET.to_vec()));

        let session = warp::test::request()
            .header("authorization", format!("Bearer {}", token()))
            .filter(&filter)
            .await
            .unwrap();

        assert_eq!(session.user_id, 3);
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let filter = with_session(Arc::new(SECRET.to_vec()));

        assert!(warp::test::request().filter(&filter).await.is_err());
    }

    #[tokio::test]
    async fn invalid_token_is_anonymous_on_optional_routes() {
        let filter = with_possible_session(Arc::new(SECRET.to_vec()));

        let session = warp::test::request()
            .header("authorization", "Bearer forged")
            .filter(&filter)
            .await
            .unwrap();

        assert!(session.is_none());
    }
}
