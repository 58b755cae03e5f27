use anyhow::Context as _;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::Argon2;
use tokio::task::spawn_blocking;

use crate::domain::repository::PasswordHasher;
use crate::error::ApiError;

/// Argon2id with the crate's default parameters, stored as PHC strings.
///
/// Hashing and verification run on tokio's blocking pool.
#[derive(Clone, Copy, Default)]
pub struct Argon2Hasher;

fn hash_blocking(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let hash = spawn_blocking(move || hash_blocking(&password))
            .await
            .context("password hashing task")??;
        Ok(hash)
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        let (password, hash) = (password.to_owned(), hash.to_owned());
        match spawn_blocking(move || verify_blocking(&password, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }
}
