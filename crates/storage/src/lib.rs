//! Storage layer for inner-map
//!
//! A minimal key-value substrate (file-backed or in-memory) and the journal
//! store that keeps every insight record under a single key.

mod error;
mod file_store;
mod kv;
mod session_store;

pub use error::StorageError;
pub use file_store::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use session_store::SessionStore;
