// Domain models shared by the auth core, the stores and the HTTP layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of an authenticated user (the credential record's id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored credential record
///
/// `password_hash` is a bcrypt digest; the plaintext never reaches this type.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn identity(&self) -> Identity {
        Identity(self.id)
    }
}

/// Credential record to be inserted by a `UserRepository`
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Validated content payload (title and link present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub link: String,
    pub tags: Vec<String>,
}

/// Stored content record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub owner: Identity,
    pub created_at: DateTime<Utc>,
}

/// Owner summary embedded in content listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
}

/// Content record as returned to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub user_id: OwnerSummary,
    pub created_at: DateTime<Utc>,
}

/// Signup request body
///
/// Missing fields deserialize as empty strings so they fail validation
/// rather than JSON extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Signin request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Content creation request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `DELETE /api/v1/content`
///
/// `content_id` is `None` when the key is absent and `Some(None)` when it is
/// an explicit `null`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteContentRequest {
    #[serde(default, deserialize_with = "present")]
    pub content_id: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
