//! Access policies for the HTTP resources.
//!
//! Each policy is a pure predicate over the request method, the caller (if
//! any) and, for object-level checks, the owner of the target. The API layer
//! turns a `false` into 401 for anonymous callers and 403 otherwise.

use http::Method;

use crate::roles::Role;
use crate::types::DbId;

/// The authenticated party making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
    pub is_superuser: bool,
}

impl Actor {
    /// Admin role or superuser flag.
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role == Role::Admin
    }

    /// Moderator, admin or superuser.
    pub fn is_moderator(&self) -> bool {
        self.is_admin() || self.role == Role::Moderator
    }
}

/// GET, HEAD and OPTIONS.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/* --------------------------------------------------------------------------
Admin or read list (categories, genres)
-------------------------------------------------------------------------- */

/// Anyone may read the collection; writing requires an admin.
pub fn admin_or_read_list(method: &Method, caller: Option<&Actor>) -> bool {
    is_safe_method(method) || caller.is_some_and(Actor::is_admin)
}

/// Individual entries are admin-only regardless of method.
pub fn admin_or_read_list_object(caller: Option<&Actor>) -> bool {
    caller.is_some_and(Actor::is_admin)
}

/* --------------------------------------------------------------------------
Admin or read only (titles)
-------------------------------------------------------------------------- */

pub fn admin_or_read_only(method: &Method, caller: Option<&Actor>) -> bool {
    is_safe_method(method) || caller.is_some_and(Actor::is_admin)
}

/* --------------------------------------------------------------------------
Self or admin (user directory)
-------------------------------------------------------------------------- */

/// The profile route is open to any authenticated caller; the rest of the
/// directory needs an admin.
pub fn self_or_admin(caller: Option<&Actor>, is_me_route: bool) -> bool {
    match caller {
        Some(actor) => is_me_route || actor.is_admin(),
        None => false,
    }
}

/// Role a caller ends up with after asking for `requested` on their own
/// profile. Only admins may change a role; for everyone else the request is
/// ignored and `current` is kept.
pub fn self_assignable_role(actor: &Actor, current: Role, requested: Option<Role>) -> Role {
    match requested {
        Some(role) if actor.is_admin() => role,
        _ => current,
    }
}

/* --------------------------------------------------------------------------
Author or privileged write (reviews, comments)
-------------------------------------------------------------------------- */

/// Reads are public; any authenticated user may create.
pub fn author_or_privileged(method: &Method, caller: Option<&Actor>) -> bool {
    is_safe_method(method) || caller.is_some()
}

/// Reads are public. PATCH and DELETE are limited to the author, moderators,
/// admins and superusers. Every other write method is refused.
pub fn author_or_privileged_object(
    method: &Method,
    caller: Option<&Actor>,
    author_id: DbId,
) -> bool {
    if is_safe_method(method) {
        return true;
    }
    if *method != Method::PATCH && *method != Method::DELETE {
        return false;
    }
    caller.is_some_and(|actor| actor.id == author_id || actor.is_moderator())
}
