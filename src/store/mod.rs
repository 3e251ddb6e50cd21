// Persistence interfaces consumed by the auth core and the content layer

pub mod memory;
pub mod postgres;

use crate::core::errors::AuthError;
use crate::core::models::{ContentView, CredentialRecord, Identity, NewContent, NewCredential};
use async_trait::async_trait;
use uuid::Uuid;

/// Credential record lookup and creation
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a credential record by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError>;

    /// Insert a new credential record
    ///
    /// Must return `AuthError::DuplicateIdentity` when the username is taken,
    /// including when a concurrent insert wins the race.
    async fn insert_user(&self, user: NewCredential) -> Result<CredentialRecord, AuthError>;
}

/// Content storage where every operation is keyed by the owning identity
///
/// Implementations must filter every query and mutation on the owner. No
/// method addresses a record by id alone.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn insert_content(&self, owner: &Identity, content: NewContent) -> Result<ContentView, AuthError>;

    async fn list_for_owner(&self, owner: &Identity) -> Result<Vec<ContentView>, AuthError>;

    async fn find_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<Option<ContentView>, AuthError>;

    /// Delete one record owned by `owner`; returns the number removed (0 or 1)
    async fn delete_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<u64, AuthError>;

    /// Delete every record owned by `owner`; returns the number removed
    async fn delete_all_for_owner(&self, owner: &Identity) -> Result<u64, AuthError>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), AuthError>;
}
