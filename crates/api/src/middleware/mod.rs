//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user behind a JWT Bearer token.
//! - [`auth::MaybeUser`] -- Same, but anonymous requests are allowed through.
//! - [`rbac::AdminOrReadList`], [`rbac::AdminOrReadOnly`],
//!   [`rbac::AuthorOrPrivileged`] -- Collection-level gates per resource.
//! - [`rbac::RequireSelfOrAdmin`] -- Gate for the user directory.
//! - [`rbac::authorize`] -- Turns a policy verdict into 401/403.

pub mod auth;
pub mod rbac;
