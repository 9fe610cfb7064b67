//! # Warden Identity
//!
//! This crate provides the identity-graph domain records for the Warden
//! platform, shared by the closure engine and permission resolver.
//!
//! ## Overview
//!
//! The warden-identity crate handles:
//! - **Identities**: user and group records keyed by a stable object id
//! - **Membership edges**: directed "subject is member of member_of" relations
//! - **Permission grants**: time-windowed privilege assertions
//! - **Store interface**: the narrow read seam to the collaborating store
//!
//! ## Architecture
//!
//! ```text
//! Identity (user | group)
//!   ├─ MembershipEdge ─→ Identity        (directed, cycles permitted)
//!   └─ PermissionGrant ─→ target         (privilege, [starts, ends])
//!
//! IdentityStore (trait)
//!   └─ MemoryIdentityStore               (in-process, testing + embedding)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use warden_identity::{Identity, ObjectType, PermissionGrant};
//!
//! // Create identities
//! let group = Identity::new(ObjectType::Group).with_fullname("Engineering");
//! let user = Identity::new(ObjectType::User)
//!     .with_email("dev@example.org")
//!     .with_firstname("Dana");
//!
//! // Grant a privilege with an open validity window
//! let grant = PermissionGrant::new("read", user.object_id, group.object_id);
//! assert!(grant.starts <= grant.ends);
//! ```
//!
//! ## Integration with warden-graph
//!
//! The `IdentityStore` trait is consumed by `warden-graph` for closure
//! computation and tree rendering, and by `warden-rbac` for permission
//! resolution. Implementations only need the read operations; identity,
//! edge, and grant mutation stays with the collaborating store.

pub mod error;
pub mod grant;
pub mod identity;
pub mod membership;
pub mod store;

// Re-export main types for convenience
pub use error::{StoreError, StoreResult};
pub use grant::PermissionGrant;
pub use identity::{Identity, ObjectType};
pub use membership::MembershipEdge;
pub use store::{IdentityStore, MemoryIdentityStore};
