//! Opaque owner references.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tagged reference to the entity that owns a wallet or transaction.
///
/// The ledger never loads the owner's own record; it only stores and compares
/// this (kind, id) pair. `kind` is a free-form tag such as `"user"` or
/// `"merchant"` so any entity type in the host application can own wallets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    /// Entity kind tag, e.g. `"user"`.
    pub kind: String,
    /// Entity identifier within its kind.
    pub id: Uuid,
}

impl OwnerRef {
    /// Creates an owner reference from a kind tag and an id.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self { kind: kind.into(), id }
    }

    /// Convenience constructor for the common `"user"` kind.
    #[must_use]
    pub fn user(id: Uuid) -> Self {
        Self::new("user", id)
    }
}

impl std::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
