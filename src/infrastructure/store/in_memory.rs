//! In-memory document store implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::comment::{Comment, CommentRepository};
use crate::domain::document::{Document, DocumentKey, ItemId, Repository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::store::{Connection, StoreContext};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Address reported by in-memory connections
pub const MEMORY_ADDRESS: &str = "memory://";

#[derive(Debug)]
struct CollectionState<E> {
    entities: Vec<E>,
    positions: HashMap<Uuid, usize>,
    unique: HashMap<(&'static str, String), Uuid>,
}

impl<E> Default for CollectionState<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            positions: HashMap::new(),
            unique: HashMap::new(),
        }
    }
}

impl<E: Document> CollectionState<E> {
    /// Fails on the first unique key already held by another document
    fn check_unique(&self, entity: &E) -> Result<(), DomainError> {
        let own = entity.id().as_uuid();

        for key in entity.unique_keys() {
            match self.unique.get(&(key.field, key.value)) {
                Some(holder) if *holder != own => return Err(DomainError::conflict(key.field)),
                _ => {}
            }
        }

        Ok(())
    }

    fn index(&mut self, entity: &E) {
        let id = entity.id().as_uuid();
        for key in entity.unique_keys() {
            self.unique.insert((key.field, key.value), id);
        }
    }

    fn unindex(&mut self, entity: &E) {
        for key in entity.unique_keys() {
            self.unique.remove(&(key.field, key.value));
        }
    }

    /// Append a new document after checking its unique keys
    fn push(&mut self, mut entity: E) -> Result<E, DomainError> {
        self.check_unique(&entity)?;
        entity.stamp(Utc::now(), true);

        self.index(&entity);
        self.positions.insert(entity.id().as_uuid(), self.entities.len());
        self.entities.push(entity.clone());
        Ok(entity)
    }

    /// Overwrite the document at `position` in place
    fn replace(&mut self, position: usize, mut entity: E) -> Result<E, DomainError> {
        self.check_unique(&entity)?;
        entity.stamp(Utc::now(), false);

        let previous = self.entities[position].clone();
        self.unindex(&previous);
        self.index(&entity);
        self.entities[position] = entity.clone();
        Ok(entity)
    }
}

/// Thread-safe in-memory collection
///
/// Keeps documents in insertion order and enforces the unique keys each
/// document declares. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryCollection<E>
where
    E: Document,
{
    state: RwLock<CollectionState<E>>,
}

impl<E> Default for InMemoryCollection<E>
where
    E: Document,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryCollection<E>
where
    E: Document,
{
    /// Creates a new empty collection
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CollectionState::default()),
        }
    }

    async fn filter<F>(&self, predicate: F) -> Vec<E>
    where
        F: Fn(&E) -> bool,
    {
        let state = self.state.read().await;
        state.entities.iter().filter(|e| predicate(e)).cloned().collect()
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryCollection<E>
where
    E: Document + 'static,
{
    async fn insert(&self, mut entity: E) -> Result<E, DomainError> {
        entity.prepare()?;

        let mut state = self.state.write().await;
        if state.positions.contains_key(&entity.id().as_uuid()) {
            return Err(DomainError::conflict("id"));
        }

        let entity = state.push(entity)?;
        debug!(collection = E::COLLECTION, id = %entity.id(), "Inserted document");
        Ok(entity)
    }

    async fn save(&self, mut entity: E) -> Result<E, DomainError> {
        entity.prepare()?;

        let mut state = self.state.write().await;
        match state.positions.get(&entity.id().as_uuid()).copied() {
            Some(position) => state.replace(position, entity),
            None => state.push(entity),
        }
    }

    async fn get(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .positions
            .get(&id.as_uuid())
            .map(|position| state.entities[*position].clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.state.read().await.entities.clone())
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let removed = state.entities.len() as u64;
        *state = CollectionState::default();
        Ok(removed)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.entities.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryCollection<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username = username.to_lowercase();
        Ok(self
            .filter(|u| u.username() == username)
            .await
            .into_iter()
            .next())
    }

    async fn count_with_favorite(&self, item: &ItemId) -> Result<u64, DomainError> {
        Ok(self.filter(|u| u.is_favorite(item)).await.len() as u64)
    }
}

#[async_trait]
impl ItemRepository for InMemoryCollection<Item> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Item>, DomainError> {
        let slug = slug.to_lowercase();
        Ok(self
            .filter(|i| i.slug() == Some(slug.as_str()))
            .await
            .into_iter()
            .next())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCollection<Comment> {
    async fn list_for_item(&self, item: &ItemId) -> Result<Vec<Comment>, DomainError> {
        Ok(self.filter(|c| c.item() == item).await)
    }
}

/// Connection handle for the in-memory store
#[derive(Debug)]
pub struct InMemoryConnection {
    connected: AtomicBool,
}

impl Default for InMemoryConnection {
    fn default() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl Connection for InMemoryConnection {
    fn address(&self) -> &str {
        MEMORY_ADDRESS
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            debug!(address = MEMORY_ADDRESS, "Disconnected");
        }
    }
}

/// In-memory document store holding the three collections
///
/// Every [`InMemoryStore::connect`] call hands out a new connection over the
/// same collections, so data survives a disconnect/reconnect cycle.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Arc<InMemoryCollection<User>>,
    items: Arc<InMemoryCollection<Item>>,
    comments: Arc<InMemoryCollection<Comment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection to this store
    pub fn connect(&self) -> StoreContext {
        StoreContext::new(
            Arc::new(InMemoryConnection::default()),
            self.users.clone(),
            self.items.clone(),
            self.comments.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{CommentId, UserId};

    fn user(name: &str) -> User {
        User::new(name, format!("{}@example.com", name))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        let alice = user("Alice");

        let stored = users.insert(alice.clone()).await.unwrap();
        assert_eq!(stored.username(), "alice");

        let fetched = users.get(alice.id()).await.unwrap().unwrap();
        assert_eq!(fetched.username(), "alice");
        assert!(users.get(&UserId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_runs_validation() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();

        let err = users.insert(user("bad name")).await.unwrap_err();
        assert_eq!(err, DomainError::invalid("username"));
        assert_eq!(users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_case_insensitive() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.insert(User::new("alice", "a1@example.com")).await.unwrap();

        let err = users
            .insert(User::new("ALICE", "a2@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::conflict("username"));
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.insert(User::new("alice", "same@example.com")).await.unwrap();

        let err = users
            .insert(User::new("bob", "Same@Example.com"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::conflict("email"));
    }

    #[tokio::test]
    async fn test_duplicate_slug() {
        let items: InMemoryCollection<Item> = InMemoryCollection::new();
        let seller = UserId::generate();

        let first = items
            .insert(Item::new("Lamp", "Bright", seller))
            .await
            .unwrap();

        let mut copy = serde_json::to_value(Item::new("Other", "Thing", seller)).unwrap();
        copy["slug"] = serde_json::Value::String(first.slug().unwrap().to_uppercase());
        let copy: Item = serde_json::from_value(copy).unwrap();

        let err = items.insert(copy).await.unwrap_err();
        assert_eq!(err, DomainError::conflict("slug"));
    }

    #[tokio::test]
    async fn test_same_title_items_coexist() {
        let items: InMemoryCollection<Item> = InMemoryCollection::new();
        let seller = UserId::generate();

        let a = items.insert(Item::new("Lamp", "One", seller)).await.unwrap();
        let b = items.insert(Item::new("Lamp", "Two", seller)).await.unwrap();

        assert_ne!(a.slug(), b.slug());
        assert_eq!(items.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_twice_is_conflict() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        let alice = user("alice");

        users.insert(alice.clone()).await.unwrap();
        let err = users.insert(alice).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_save_updates_in_place() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.insert(user("alice")).await.unwrap();
        let mut bob = users.insert(user("bob")).await.unwrap();

        bob.favorite(ItemId::generate());
        users.save(bob.clone()).await.unwrap();

        let all = users.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].favorites().len(), 1);
        assert!(all[1].updated_at() >= all[1].created_at());
    }

    #[tokio::test]
    async fn test_save_keeps_unique_index_current() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        let alice = users.insert(user("alice")).await.unwrap();

        let renamed: User = {
            let mut json = serde_json::to_value(&alice).unwrap();
            json["username"] = "alicia".into();
            serde_json::from_value(json).unwrap()
        };
        users.save(renamed).await.unwrap();

        // The old username is free again
        users
            .insert(User::new("alice", "other@example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_inserts_unknown_document() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.save(user("alice")).await.unwrap();
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        for i in 0..5 {
            users.insert(user(&format!("user{}", i))).await.unwrap();
        }

        let names: Vec<_> = users
            .list()
            .await
            .unwrap()
            .iter()
            .map(|u| u.username().to_string())
            .collect();
        assert_eq!(names, ["user0", "user1", "user2", "user3", "user4"]);
    }

    #[tokio::test]
    async fn test_delete_all_resets_uniqueness() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.insert(user("alice")).await.unwrap();
        users.insert(user("bob")).await.unwrap();

        assert_eq!(users.delete_all().await.unwrap(), 2);
        assert_eq!(users.count().await.unwrap(), 0);

        users.insert(user("alice")).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_save_racing_delete_all() {
        let users: Arc<InMemoryCollection<User>> = Arc::new(InMemoryCollection::new());
        let mut tasks = Vec::new();

        for i in 0..50 {
            let stored = users.insert(user(&format!("user{}", i))).await.unwrap();

            let saver = users.clone();
            tasks.push(tokio::spawn(async move {
                saver.save(stored).await.map(|_| ())
            }));

            let purger = users.clone();
            tasks.push(tokio::spawn(async move {
                purger.delete_all().await.map(|_| ())
            }));
        }

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!(users.count().await.unwrap() <= 50);
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        users.insert(user("alice")).await.unwrap();

        assert!(users.find_by_username("ALICE").await.unwrap().is_some());
        assert!(users.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_with_favorite() {
        let users: InMemoryCollection<User> = InMemoryCollection::new();
        let item = ItemId::generate();

        let mut alice = user("alice");
        alice.favorite(item);
        let mut bob = user("bob");
        bob.favorite(item);
        users.insert(alice).await.unwrap();
        users.insert(bob).await.unwrap();
        users.insert(user("carol")).await.unwrap();

        assert_eq!(users.count_with_favorite(&item).await.unwrap(), 2);
        assert_eq!(
            users.count_with_favorite(&ItemId::generate()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_find_by_slug_and_comments_for_item() {
        let store = InMemoryStore::new();
        let context = store.connect();
        let seller = UserId::generate();

        let item = context
            .items()
            .insert(Item::new("Lamp", "Bright", seller))
            .await
            .unwrap();
        let slug = item.slug().unwrap().to_string();

        let found = context.items().find_by_slug(&slug).await.unwrap().unwrap();
        assert_eq!(found.id(), item.id());

        context
            .comments()
            .insert(Comment::new("Nice", seller, *item.id()))
            .await
            .unwrap();
        context
            .comments()
            .insert(Comment::new("Elsewhere", seller, ItemId::generate()))
            .await
            .unwrap();

        let comments = context.comments().list_for_item(item.id()).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body(), "Nice");
        assert!(context.comments().get(&CommentId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reconnect_sees_same_data() {
        let store = InMemoryStore::new();

        let first = store.connect();
        first.users().insert(user("alice")).await.unwrap();
        first.disconnect().await;
        assert!(!first.connection().is_connected());

        let second = store.connect();
        assert!(second.connection().is_connected());
        assert_eq!(second.users().count().await.unwrap(), 1);
        assert_eq!(second.connection().address(), MEMORY_ADDRESS);
    }
}
