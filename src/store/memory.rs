// In-process store for local runs (`DATABASE_URL=memory://`) and tests

use crate::core::errors::AuthError;
use crate::core::models::{
    ContentRecord, ContentView, CredentialRecord, Identity, NewContent, NewCredential, OwnerSummary,
};
use crate::store::{ContentRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Memory-backed user and content store
///
/// Users are keyed by username so the uniqueness check and the insert happen
/// under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, CredentialRecord>>,
    content: RwLock<HashMap<Uuid, ContentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn owner_summary(&self, owner: &Identity) -> Option<OwnerSummary> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.id == owner.as_uuid())
            .map(|u| OwnerSummary {
                id: u.id,
                username: u.username.clone(),
            })
    }

    fn view(record: &ContentRecord, owner: &OwnerSummary) -> ContentView {
        ContentView {
            id: record.id,
            title: record.title.clone(),
            link: record.link.clone(),
            tags: record.tags.clone(),
            user_id: owner.clone(),
            created_at: record.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_user(&self, user: NewCredential) -> Result<CredentialRecord, AuthError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AuthError::DuplicateIdentity);
        }

        let record = CredentialRecord {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            created_at: Utc::now(),
        };
        users.insert(record.username.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn insert_content(&self, owner: &Identity, content: NewContent) -> Result<ContentView, AuthError> {
        let summary = self.owner_summary(owner).await.ok_or_else(|| {
            AuthError::Persistence(format!("content owner {} does not exist", owner))
        })?;
        let record = ContentRecord {
            id: Uuid::new_v4(),
            title: content.title,
            link: Some(content.link),
            tags: content.tags,
            owner: *owner,
            created_at: Utc::now(),
        };
        let view = Self::view(&record, &summary);
        self.content.write().await.insert(record.id, record);
        Ok(view)
    }

    async fn list_for_owner(&self, owner: &Identity) -> Result<Vec<ContentView>, AuthError> {
        let Some(summary) = self.owner_summary(owner).await else {
            return Ok(Vec::new());
        };
        let content = self.content.read().await;
        let mut records: Vec<&ContentRecord> =
            content.values().filter(|c| c.owner == *owner).collect();
        records.sort_by_key(|c| c.created_at);
        Ok(records.into_iter().map(|c| Self::view(c, &summary)).collect())
    }

    async fn find_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<Option<ContentView>, AuthError> {
        let Some(summary) = self.owner_summary(owner).await else {
            return Ok(None);
        };
        let content = self.content.read().await;
        Ok(content
            .get(&content_id)
            .filter(|c| c.owner == *owner)
            .map(|c| Self::view(c, &summary)))
    }

    async fn delete_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<u64, AuthError> {
        let mut content = self.content.write().await;
        match content.get(&content_id) {
            Some(record) if record.owner == *owner => {
                content.remove(&content_id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_all_for_owner(&self, owner: &Identity) -> Result<u64, AuthError> {
        let mut content = self.content.write().await;
        let before = content.len();
        content.retain(|_, c| c.owner != *owner);
        Ok((before - content.len()) as u64)
    }

    async fn ping(&self) -> Result<(), AuthError> {
        Ok(())
    }
}
