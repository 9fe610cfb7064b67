//! Error types for store and graph operations
//!
//! This module defines the failure taxonomy shared by the store interface
//! and everything built on top of it. Dangling references (edges or grants
//! pointing at absent identities) are deliberately NOT an error: they are
//! recovered locally by the traversals and surfaced as a count.

use thiserror::Error;
use uuid::Uuid;

/// Store and lookup error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced identity does not exist in the store
    #[error("identity {object_id} not found")]
    IdentityNotFound {
        /// The object id that failed to resolve
        object_id: Uuid,
    },

    /// No identity carries the given email
    #[error("no identity with email {email}")]
    EmailNotFound {
        /// The email that failed to resolve
        email: String,
    },

    /// The collaborating store failed to answer; propagated immediately,
    /// never retried here
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Check whether this is a not-found condition (by id or by email).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IdentityNotFound { .. } | Self::EmailNotFound { .. }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
