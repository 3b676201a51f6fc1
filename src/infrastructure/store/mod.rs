//! Store infrastructure - Document store adapters

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StoreBackend, StoreConfig, StoreFactory};
pub use in_memory::{InMemoryCollection, InMemoryConnection, InMemoryStore, MEMORY_ADDRESS};
pub use postgres::{PostgresCollection, PostgresConnection};
