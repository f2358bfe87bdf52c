use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use log::warn;

use crate::errors::AppError;

/// Argon2id hashing with a configurable work factor. Each hash carries its own
/// random salt and parameters in PHC format, so changing the work factor does not
/// invalidate existing hashes.
#[derive(Clone, Debug, Default)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    pub fn new(iterations: Option<u32>, memory_kib: Option<u32>) -> Result<Self, argon2::Error> {
        let params = Params::new(
            memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            iterations.unwrap_or(Params::DEFAULT_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AppError::Internal(format!("Hashing error: {err}")))
    }

    /// True only when `password` matches `stored`. An unparseable stored hash is
    /// logged and treated as a mismatch.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Stored password hash could not be parsed: {}", err);
                return false;
            }
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
