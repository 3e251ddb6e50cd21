// Unit tests for MemoryStore under concurrent access

use content_vault::core::errors::AuthError;
use content_vault::core::models::{NewContent, NewCredential};
use content_vault::store::memory::MemoryStore;
use content_vault::store::{ContentRepository, UserRepository};
use std::sync::Arc;

fn new_user(username: &str) -> NewCredential {
    NewCredential {
        username: username.to_string(),
        password_hash: "$2b$04$digest".to_string(),
        email: format!("{}@example.com", username),
    }
}

#[tokio::test]
async fn test_concurrent_signups_admit_exactly_one() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.insert_user(new_user("alice")).await })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AuthError::DuplicateIdentity) => duplicates += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 15);
}

#[tokio::test]
async fn test_listing_is_ordered_by_creation() {
    let store = MemoryStore::new();
    let owner = store.insert_user(new_user("alice")).await.unwrap().identity();

    for title in ["first", "second", "third"] {
        store
            .insert_content(
                &owner,
                NewContent {
                    title: title.to_string(),
                    link: "https://example.com".to_string(),
                    tags: vec![],
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let titles: Vec<String> = store
        .list_for_owner(&owner)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}
