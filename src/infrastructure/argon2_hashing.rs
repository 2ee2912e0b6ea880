use anyhow::Result;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

pub fn hash(password: String) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let bytes_password = password.as_bytes();

    let argon2 = Argon2::default();

    let value = argon2
        .hash_password(bytes_password, &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?;

    Ok(value.to_string())
}

pub fn verify(password: String, hashed_password: String) -> Result<bool> {
    let parsed_hash = PasswordHash::new(&hashed_password)
        .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {}", e))?;

    let bytes_password = password.as_bytes();

    Ok(Argon2::default()
        .verify_password(bytes_password, &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_same_password() {
        let hashed = hash("s3cret-pass".to_string()).unwrap();

        assert!(hashed.starts_with("$argon2"));
        assert!(verify("s3cret-pass".to_string(), hashed).unwrap());
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let hashed = hash("s3cret-pass".to_string()).unwrap();

        assert!(!verify("wrong".to_string(), hashed).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash("same".to_string()).unwrap();
        let second = hash("same".to_string()).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify("pw".to_string(), "not-a-phc-string".to_string()).is_err());
    }
}
