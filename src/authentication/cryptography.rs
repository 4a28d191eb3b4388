use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::error::{QueryError, RecipeError};

fn hashing_failed(e: password_hash::Error) -> RecipeError {
    log::error!("> Password hashing failed: {e}");
    RecipeError::Storage(QueryError::new(String::from("Could not process password")))
}

/// Argon2id hash of `password` in PHC string format with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, RecipeError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(hashing_failed)
}

/// A mismatch is `Ok(false)`; a stored value that is not a PHC string is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, RecipeError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(hashing_failed)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(hashing_failed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_hashed_password() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("correct horse").unwrap(),
            hash_password("correct horse").unwrap()
        );
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(RecipeError::Storage(_))
        ));
    }
}
