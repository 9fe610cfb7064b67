//! # Warden Graph
//!
//! Transitive closure and hierarchy rendering over the Warden membership
//! graph.
//!
//! ## Overview
//!
//! The warden-graph crate handles:
//! - **Ancestor closure**: every group an identity transitively belongs to
//! - **Descendant closure**: every identity transitively contained in a group
//! - **Tree rendering**: deterministic, cycle-safe hierarchy listings
//!
//! Both closures are breadth-first fixpoints over the store's adjacency
//! lookups: a visited set gates expansion, so traversal terminates on any
//! finite graph — cyclic input included — and each record's level is the
//! shortest hop count from the root.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), warden_identity::StoreError> {
//! use warden_graph::ClosureEngine;
//! use warden_identity::{Identity, MemoryIdentityStore, ObjectType};
//!
//! let store = MemoryIdentityStore::new_shared();
//! let user = Identity::new(ObjectType::User).with_firstname("Dana");
//! let group = Identity::new(ObjectType::Group).with_fullname("Staff");
//! store.add_identity(user.clone()).await;
//! store.add_identity(group.clone()).await;
//! store.add_membership(user.object_id, group.object_id).await;
//!
//! let engine = ClosureEngine::new(store);
//! let closure = engine.ancestors(user.object_id).await?;
//! assert_eq!(closure.level_of(group.object_id), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod closure;
pub mod tree;

// Re-export main types for convenience
pub use closure::{Closure, ClosureEngine, ClosureRecord};
pub use tree::{Tree, TreeOptions, TreeRenderer, TreeRow};
