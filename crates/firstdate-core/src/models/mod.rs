pub mod account;
pub mod preferences;
pub mod submission;
