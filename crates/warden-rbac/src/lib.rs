//! # Warden RBAC
//!
//! Effective permission resolution for the Warden platform: combines the
//! ancestor closure of a subject with time-windowed grant records to answer
//! "does this subject hold this privilege on this target right now?".
//!
//! ## Overview
//!
//! A subject effectively *is* itself plus every group it transitively
//! belongs to. A check passes iff at least one grant matches the privilege,
//! names the exact target, is held by any identity in that ancestor closure,
//! and is active at the evaluation instant (validity windows are inclusive
//! on both ends). The semantics are existential: multiple simultaneously
//! active grants never conflict.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), warden_identity::StoreError> {
//! use chrono::Utc;
//! use uuid::Uuid;
//! use warden_identity::{Identity, MemoryIdentityStore, ObjectType, PermissionGrant};
//! use warden_rbac::PermissionResolver;
//!
//! let store = MemoryIdentityStore::new_shared();
//! let user = Identity::new(ObjectType::User);
//! let group = Identity::new(ObjectType::Group);
//! let doc = Uuid::now_v7();
//!
//! store.add_identity(user.clone()).await;
//! store.add_identity(group.clone()).await;
//! store.add_membership(user.object_id, group.object_id).await;
//! store.add_grant(PermissionGrant::new("read", group.object_id, doc)).await;
//!
//! let resolver = PermissionResolver::new(store);
//! assert!(resolver.has_permission(user.object_id, "read", doc, Utc::now()).await?);
//! # Ok(())
//! # }
//! ```

pub mod resolver;

// Re-export main types for convenience
pub use resolver::{CheckDecision, PermissionResolver};
