pub mod schema;
pub mod schema_tree;
pub mod store;

pub use schema::{SchemaNode, ValueAlias};
pub use schema_tree::{SchemaId, SchemaRef, SchemaTree};
pub use store::{DataStore, InMemoryStore, NoStore, StoreError};
