//! Domain layer for the YaMDb backend.
//!
//! Pure types and rules shared by the database and API crates. Nothing in
//! here performs I/O.

pub mod accounts;
pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod roles;
pub mod types;
