//! firstdate-export
//!
//! Flattens stored questionnaire responses into a table and renders it as
//! CSV for the admin download.

pub mod csv;
pub mod error;
pub mod table;

pub use error::ExportError;
pub use table::{tabulate, ResponseTable};
