//! Command handlers. Each translates parsed arguments into service calls
//! and prints the result; no pipeline logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod index;
pub mod init;
pub mod query;
pub mod request;
