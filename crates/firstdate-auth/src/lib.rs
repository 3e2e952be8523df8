//! firstdate-auth
//!
//! Account registration, sessions, password recovery, and email
//! verification against the hosted account backend.

pub mod appwrite;
pub mod error;
pub mod flows;
pub mod forms;
pub mod memory;
pub mod service;

pub use error::AuthError;
pub use service::AccountService;
