//! firstdate-storage
//!
//! Document store access. Thin wrapper around the Appwrite REST API, an
//! in-memory store with the same semantics, and the cursor pagination walk
//! used by the admin export.

pub mod client;
pub mod documents;
pub mod error;
pub mod memory;
pub mod pagination;
