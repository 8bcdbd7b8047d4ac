use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{rngs::OsRng, RngCore};
use tracing::error;

const SALT_BYTES: usize = 16;

/// Fresh per-user salt: 16 random bytes, hex encoded.
pub fn generate_salt() -> String {
    let mut buf = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

// Password and salt are joined as "<password>:<salt>" before hashing.
fn salted(plain: &str, salt: &str) -> String {
    format!("{plain}:{salt}")
}

/// Hashes `plain` combined with `salt` using Argon2id.
///
/// The argon2 salt is derived from the user salt, so the output is stable for
/// a given pair.
pub fn hash_password(plain: &str, salt: &str) -> anyhow::Result<String> {
    let argon_salt = SaltString::encode_b64(salt.as_bytes()).map_err(|e| {
        error!(error = %e, "argon2 salt encode error");
        anyhow::anyhow!(e.to_string())
    })?;
    let hash = Argon2::default()
        .hash_password(salted(plain, salt).as_bytes(), &argon_salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, salt: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(salted(plain, salt).as_bytes(), &parsed)
        .is_ok())
}
