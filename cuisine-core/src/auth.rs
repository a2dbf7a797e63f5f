//! Authorization predicates shared by every caller that mutates data.
//!
//! The store itself never checks identity; callers hold the session and
//! must ask these predicates before invoking a mutating operation.

use std::str::FromStr;

use crate::error::ParseVariantError;
use crate::types::User;

/// Who may create recipes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Any signed-in user may create recipes.
    #[default]
    AnyUser,
    /// Only admins may create recipes.
    AdminOnly,
}

impl FromStr for WritePolicy {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" | "user" => Ok(WritePolicy::AnyUser),
            "admin" => Ok(WritePolicy::AdminOnly),
            _ => Err(ParseVariantError::new("write policy", s, "any or admin")),
        }
    }
}

/// True when `user` may edit or delete a resource owned by `owner`.
///
/// Admins may edit anything. Everyone else only what they authored.
pub fn can_edit(user: &User, owner: &str) -> bool {
    user.is_admin() || (!user.username.is_empty() && user.username == owner)
}

pub fn can_create(user: &User, policy: WritePolicy) -> bool {
    if user.username.is_empty() {
        return false;
    }
    match policy {
        WritePolicy::AnyUser => true,
        WritePolicy::AdminOnly => user.is_admin(),
    }
}
