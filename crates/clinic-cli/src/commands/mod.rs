//! Subcommand implementations.

pub mod auth;
pub mod resources;
pub mod routes;
