// Credential hashing: salted bcrypt, dispatched to the blocking pool

use crate::auth::secret::Password;
use crate::core::errors::AuthError;
use std::sync::{Arc, OnceLock};
use tracing::error;

/// Work factor used for stored credentials
pub const DEFAULT_COST: u32 = 10;

/// One-way password hasher
///
/// bcrypt embeds a random salt in every digest, so hashing the same
/// plaintext twice yields two different digests that both verify.
/// All hashing runs on `spawn_blocking`.
#[derive(Clone)]
pub struct CredentialHasher {
    cost: u32,
    decoy_digest: Arc<OnceLock<String>>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    /// Create a hasher with an explicit bcrypt cost (4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            decoy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Hash a plaintext password
    pub async fn hash(&self, password: &Password) -> Result<String, AuthError> {
        let plaintext = password.expose_secret().to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task failed: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AuthError::Internal("password hashing failed".to_string())
            })
    }

    /// Verify a plaintext password against a stored digest
    ///
    /// Never fails: a malformed digest or a crashed task yields `false`.
    pub async fn verify(&self, password: &Password, digest: &str) -> bool {
        let plaintext = password.expose_secret().to_string();
        let digest = digest.to_string();
        match tokio::task::spawn_blocking(move || verify_digest(&plaintext, &digest)).await {
            Ok(matched) => matched,
            Err(e) => {
                error!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// Spend the same work as a real verification against a throwaway digest
    ///
    /// Used when the username is unknown.
    pub async fn verify_decoy(&self, password: &Password) {
        let plaintext = password.expose_secret().to_string();
        let cost = self.cost;
        let decoy = Arc::clone(&self.decoy_digest);
        let _ = tokio::task::spawn_blocking(move || {
            let digest = decoy.get_or_init(|| bcrypt::hash("decoy-credential", cost).unwrap_or_default());
            verify_digest(&plaintext, digest)
        })
        .await;
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn verify_digest(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}
