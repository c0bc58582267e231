//! Command implementations for the CLI
//!
//! - start: Start the API server
//! - config: Configuration display and validation
//! - user: Credential management

pub mod config;
pub mod start;
pub mod user;
