// Content access bound to one authenticated identity

use crate::core::errors::AuthError;
use crate::core::models::{ContentView, CreateContentRequest, Identity, NewContent};
use crate::store::ContentRepository;
use tracing::info;
use uuid::Uuid;

/// Content operations for a single owner
///
/// Constructed from the identity the gate placed in request extensions, so
/// there is no way to reach a repository method without an owner.
pub struct OwnedContent<'a> {
    repo: &'a dyn ContentRepository,
    owner: Identity,
}

impl<'a> OwnedContent<'a> {
    pub fn new(repo: &'a dyn ContentRepository, owner: Identity) -> Self {
        Self { repo, owner }
    }

    pub async fn create(&self, request: CreateContentRequest) -> Result<ContentView, AuthError> {
        let content = validate_content(request)?;
        let view = self.repo.insert_content(&self.owner, content).await?;
        info!(user_id = %self.owner, content_id = %view.id, "Content created");
        Ok(view)
    }

    pub async fn list(&self) -> Result<Vec<ContentView>, AuthError> {
        self.repo.list_for_owner(&self.owner).await
    }

    /// Fetch one record; records owned by someone else look nonexistent
    pub async fn get(&self, content_id: Uuid) -> Result<ContentView, AuthError> {
        self.repo
            .find_for_owner(&self.owner, content_id)
            .await?
            .ok_or(AuthError::NotFoundForOwner)
    }

    /// Delete one record; deleting something absent removes nothing and succeeds
    pub async fn delete(&self, content_id: Uuid) -> Result<u64, AuthError> {
        let deleted = self.repo.delete_for_owner(&self.owner, content_id).await?;
        info!(user_id = %self.owner, content_id = %content_id, deleted, "Content deleted");
        Ok(deleted)
    }

    pub async fn delete_all(&self) -> Result<u64, AuthError> {
        let deleted = self.repo.delete_all_for_owner(&self.owner).await?;
        info!(user_id = %self.owner, deleted, "All content deleted");
        Ok(deleted)
    }
}

/// Require a non-empty title and link; blank tags are dropped
pub fn validate_content(request: CreateContentRequest) -> Result<NewContent, AuthError> {
    let title = non_blank(request.title);
    let link = non_blank(request.link);

    match (title, link) {
        (Some(title), Some(link)) => Ok(NewContent {
            title,
            link,
            tags: request
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }),
        _ => Err(AuthError::InvalidContent(
            "Link and title are required to create content".to_string(),
        )),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a content id from a path or body
pub fn parse_content_id(raw: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AuthError::InvalidContent("Invalid content id".to_string()))
}
