//! Store connection and the repositories reachable through it

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::comment::CommentRepository;
use crate::domain::item::ItemRepository;
use crate::domain::user::UserRepository;

/// An open connection to a document store
#[async_trait]
pub trait Connection: Send + Sync + Debug {
    /// Address the connection was opened against, for logging
    fn address(&self) -> &str;

    /// Whether `disconnect` has not been called yet
    fn is_connected(&self) -> bool;

    /// Release the connection. Calling it twice is a no-op.
    async fn disconnect(&self);
}

/// Everything a run needs from the store: the connection handle and the
/// typed repositories bound to it
#[derive(Debug, Clone)]
pub struct StoreContext {
    connection: Arc<dyn Connection>,
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl StoreContext {
    pub fn new(
        connection: Arc<dyn Connection>,
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            connection,
            users,
            items,
            comments,
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    pub fn items(&self) -> &Arc<dyn ItemRepository> {
        &self.items
    }

    pub fn comments(&self) -> &Arc<dyn CommentRepository> {
        &self.comments
    }

    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }
}
