// PostgreSQL-backed user and content storage

use crate::core::errors::AuthError;
use crate::core::models::{ContentView, CredentialRecord, Identity, NewContent, NewCredential, OwnerSummary};
use crate::store::{ContentRepository, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        email TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS content (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        link TEXT,
        tags TEXT[] NOT NULL DEFAULT '{}',
        user_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS idx_content_user ON content(user_id)",
];

/// Database row structure for credential lookup
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for CredentialRecord {
    fn from(r: UserRow) -> Self {
        CredentialRecord {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
            email: r.email,
            created_at: r.created_at,
        }
    }
}

/// Database row structure for content joined with its owner's username
#[derive(FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    link: Option<String>,
    tags: Vec<String>,
    user_id: Uuid,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<ContentRow> for ContentView {
    fn from(r: ContentRow) -> Self {
        ContentView {
            id: r.id,
            title: r.title,
            link: r.link,
            tags: r.tags,
            user_id: OwnerSummary {
                id: r.user_id,
                username: r.username,
            },
            created_at: r.created_at,
        }
    }
}

const SELECT_CONTENT: &str = "SELECT c.id, c.title, c.link, c.tags, c.user_id, u.username, c.created_at
     FROM content c
     JOIN users u ON u.id = c.user_id";

/// PostgreSQL store for credentials and owner-scoped content
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Connect a pool to `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AuthError> {
        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to database");
                AuthError::Persistence(e.to_string())
            })?;
        Ok(Self::new(db_pool))
    }

    /// Create tables and indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<(), AuthError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.db_pool).await?;
        }
        info!("Database schema ensured");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, email, created_at
             FROM users
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(CredentialRecord::from))
    }

    async fn insert_user(&self, user: NewCredential) -> Result<CredentialRecord, AuthError> {
        let result = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, username, password_hash, email)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, email, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .fetch_one(&self.db_pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::DuplicateIdentity)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn insert_content(&self, owner: &Identity, content: NewContent) -> Result<ContentView, AuthError> {
        let row = sqlx::query_as::<_, ContentRow>(
            "WITH inserted AS (
                 INSERT INTO content (id, title, link, tags, user_id)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id, title, link, tags, user_id, created_at
             )
             SELECT i.id, i.title, i.link, i.tags, i.user_id, u.username, i.created_at
             FROM inserted i
             JOIN users u ON u.id = i.user_id",
        )
        .bind(Uuid::new_v4())
        .bind(&content.title)
        .bind(&content.link)
        .bind(&content.tags)
        .bind(owner.as_uuid())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(row.into())
    }

    async fn list_for_owner(&self, owner: &Identity) -> Result<Vec<ContentView>, AuthError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "{} WHERE c.user_id = $1 ORDER BY c.created_at",
            SELECT_CONTENT
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows.into_iter().map(ContentView::from).collect())
    }

    async fn find_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<Option<ContentView>, AuthError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "{} WHERE c.id = $1 AND c.user_id = $2",
            SELECT_CONTENT
        ))
        .bind(content_id)
        .bind(owner.as_uuid())
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(ContentView::from))
    }

    async fn delete_for_owner(&self, owner: &Identity, content_id: Uuid) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM content WHERE id = $1 AND user_id = $2")
            .bind(content_id)
            .bind(owner.as_uuid())
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_for_owner(&self, owner: &Identity) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM content WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AuthError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
