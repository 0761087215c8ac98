//! Capability resolution for access decisions.
//!
//! Roles and the superuser flag collapse into a small named capability set,
//! resolved once per request. Resource predicates consume capabilities only;
//! they never compare roles themselves.

use crate::user::UserRole;

/// Capabilities granted to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Read any resource. Held by everyone, including anonymous callers.
    pub read: bool,
    /// Create resources and mutate resources the caller authored.
    pub write_own: bool,
    /// Mutate any review or comment regardless of author.
    pub write_any: bool,
    /// Manage the catalog and user accounts.
    pub administer: bool,
}

impl Capabilities {
    /// Capabilities of an unauthenticated caller.
    pub fn anonymous() -> Self {
        Self {
            read: true,
            write_own: false,
            write_any: false,
            administer: false,
        }
    }

    /// Resolve capabilities for an authenticated caller.
    ///
    /// The superuser flag is orthogonal to role and grants the full set.
    pub fn resolve(role: UserRole, is_superuser: bool) -> Self {
        let administer = is_superuser || role == UserRole::Admin;
        Self {
            read: true,
            write_own: true,
            write_any: administer || role == UserRole::Moderator,
            administer,
        }
    }

    /// Whether the caller may mutate an owned resource (review or comment).
    pub fn can_modify(&self, is_author: bool) -> bool {
        self.write_any || (self.write_own && is_author)
    }
}
