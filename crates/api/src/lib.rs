//! YaMDb API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, mail
//! transport) so integration tests and the binary entrypoint can both access
//! them.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
