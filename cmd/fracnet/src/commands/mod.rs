//! Subcommand implementations.

pub mod generate;
pub mod ingest;
pub mod init;
pub mod poles;
pub mod schema;
