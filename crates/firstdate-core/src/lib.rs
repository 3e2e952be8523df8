//! firstdate-core
//!
//! Pure domain types and document conventions shared by every First Date
//! crate. No backend or HTTP dependency.

#[macro_use]
pub mod choice;
pub mod document;
pub mod error;
pub mod models;
pub mod validation;
