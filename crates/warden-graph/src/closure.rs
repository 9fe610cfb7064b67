//! Membership closure computation
//!
//! This module computes the ancestor closure (every group an identity
//! transitively belongs to) and descendant closure (every identity
//! transitively contained in a group) as a breadth-first fixpoint over the
//! store's adjacency lookups. The two directions share one traversal that
//! differs only in which edge lookup it follows.
//!
//! Cycle safety: the visited map gates expansion, so each identity is
//! admitted at most once and the traversal is bounded by the number of
//! distinct identities reached. Level-order expansion makes each record's
//! level the shortest hop count from the root.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use warden_identity::{Identity, IdentityStore, ObjectType, StoreError, StoreResult};

/// One resolved entry of a closure: an identity reachable from the root,
/// annotated with its shortest hop count.
///
/// Closure records are query outputs, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClosureRecord {
    /// The root the closure was computed from
    pub root: Uuid,

    /// The resolved identity
    pub object_id: Uuid,

    /// The resolved identity's discriminator
    pub object_type: ObjectType,

    /// Shortest number of edge hops from the root (0 = the root itself)
    pub level: u32,

    /// Email of the resolved identity
    pub email: Option<String>,

    /// Given name of the resolved identity
    pub firstname: Option<String>,

    /// Full display name of the resolved identity
    pub fullname: Option<String>,
}

impl ClosureRecord {
    fn new(root: Uuid, identity: &Identity, level: u32) -> Self {
        Self {
            root,
            object_id: identity.object_id,
            object_type: identity.object_type,
            level,
            email: identity.email.clone(),
            firstname: identity.firstname.clone(),
            fullname: identity.fullname.clone(),
        }
    }
}

/// A computed closure: the root, one record per reachable identity, and the
/// count of references that could not be resolved.
///
/// Records are ordered by level, then by object id within a level, so
/// repeated computations over an unchanged graph produce identical output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Closure {
    /// The root the closure was computed from
    pub root: Uuid,

    /// One record per identity reachable from the root, root included
    pub records: Vec<ClosureRecord>,

    /// Distinct edge targets that referenced no existing identity; skipped,
    /// never fatal
    pub dangling_references: u64,
}

impl Closure {
    /// Check whether the closure contains an identity.
    pub fn contains(&self, object_id: Uuid) -> bool {
        self.records.iter().any(|r| r.object_id == object_id)
    }

    /// The level of an identity within the closure, if present.
    pub fn level_of(&self, object_id: Uuid) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.object_id == object_id)
            .map(|r| r.level)
    }

    /// The set of object ids in the closure.
    pub fn ids(&self) -> HashSet<Uuid> {
        self.records.iter().map(|r| r.object_id).collect()
    }

    /// Number of identities in the closure (root included).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the closure is empty. A successfully computed closure never
    /// is; the root is always present at level 0.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which edge direction a traversal follows.
#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Follow `member_of` edges (ancestor closure)
    Up,
    /// Follow `members` edges (descendant closure)
    Down,
}

/// Breadth-first closure engine over an identity store.
///
/// The engine is a cheap handle over `Arc<S>`: it holds no mutable state,
/// so clones can run queries concurrently against the same store snapshot
/// without coordination.
pub struct ClosureEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for ClosureEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: IdentityStore> ClosureEngine<S> {
    /// Creates a new closure engine.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Access the underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Compute the ancestor closure of `root`: itself plus every identity it
    /// is transitively a member of, each at its shortest hop count.
    ///
    /// # Arguments
    ///
    /// * `root` - The identity to start from
    ///
    /// # Returns
    ///
    /// The closure, or `IdentityNotFound` when `root` does not exist.
    pub async fn ancestors(&self, root: Uuid) -> StoreResult<Closure> {
        self.walk(root, Direction::Up).await
    }

    /// Compute the descendant closure of `root`: itself plus every identity
    /// transitively contained in it, each at its shortest hop count.
    ///
    /// # Arguments
    ///
    /// * `root` - The identity to start from
    ///
    /// # Returns
    ///
    /// The closure, or `IdentityNotFound` when `root` does not exist.
    pub async fn descendants(&self, root: Uuid) -> StoreResult<Closure> {
        self.walk(root, Direction::Down).await
    }

    async fn walk(&self, root: Uuid, direction: Direction) -> StoreResult<Closure> {
        let root_identity = self.store.get_identity(root).await?;

        let mut visited: HashMap<Uuid, u32> = HashMap::from([(root, 0)]);
        let mut records = vec![ClosureRecord::new(root, &root_identity, 0)];
        let mut frontier = vec![root];
        let mut dangling: BTreeSet<Uuid> = BTreeSet::new();
        let mut level = 0u32;

        while !frontier.is_empty() {
            level += 1;

            // Sorted so that record order, and therefore output, is stable
            // across runs regardless of the store's set iteration order.
            let mut discovered: BTreeSet<Uuid> = BTreeSet::new();
            for node in &frontier {
                let neighbors = match direction {
                    Direction::Up => self.store.member_of(*node).await?,
                    Direction::Down => self.store.members(*node).await?,
                };
                for neighbor in neighbors {
                    if !visited.contains_key(&neighbor) && !dangling.contains(&neighbor) {
                        discovered.insert(neighbor);
                    }
                }
            }

            let mut next = Vec::new();
            for neighbor in discovered {
                match self.store.get_identity(neighbor).await {
                    Ok(identity) => {
                        visited.insert(neighbor, level);
                        records.push(ClosureRecord::new(root, &identity, level));
                        next.push(neighbor);
                    }
                    Err(StoreError::IdentityNotFound { .. }) => {
                        // Referential integrity is the store's job; an edge
                        // to a missing identity is skipped, not fatal.
                        dangling.insert(neighbor);
                        warn!(
                            root = %root,
                            object_id = %neighbor,
                            "skipping dangling membership reference"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
            frontier = next;
        }

        debug!(
            root = %root,
            records = records.len(),
            dangling = dangling.len(),
            "closure complete"
        );

        Ok(Closure {
            root,
            records,
            dangling_references: dangling.len() as u64,
        })
    }
}
