//! Identity store interface and in-memory implementation
//!
//! This module provides the read seam between the graph engine and the
//! collaborating store, along with an in-process implementation suitable
//! for embedding and testing. The engine never mutates shared state through
//! this interface; identity, edge, and grant writes are serialized by the
//! external store.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::grant::PermissionGrant;
use crate::identity::Identity;
use crate::membership::MembershipEdge;

/// Read interface over identities, membership edges, and grants.
///
/// Edge lookups fail with `IdentityNotFound` only when the queried identity
/// itself is unknown; an identity with no edges yields an empty set. Edges
/// are returned as sets, so duplicate edge records never reach the
/// traversals. All operations are pure lookups against the store snapshot
/// visible at call time, so concurrent queries need no coordination.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an identity by object id.
    async fn get_identity(&self, object_id: Uuid) -> StoreResult<Identity>;

    /// Fetch every identity carrying the given email.
    ///
    /// Email is a secondary, non-unique key: several identities may share
    /// one address, and all of them are returned. Fails with
    /// `EmailNotFound` when no identity matches.
    async fn identities_by_email(&self, email: &str) -> StoreResult<Vec<Identity>>;

    /// Identities that `object_id` is a direct member of (outgoing edges).
    async fn member_of(&self, object_id: Uuid) -> StoreResult<HashSet<Uuid>>;

    /// Identities that are direct members of `object_id` (incoming edges).
    async fn members(&self, object_id: Uuid) -> StoreResult<HashSet<Uuid>>;

    /// Grants for `privilege` on `target` held by any identity in
    /// `identity_set`.
    async fn grants_for(
        &self,
        privilege: &str,
        identity_set: &HashSet<Uuid>,
        target: Uuid,
    ) -> StoreResult<Vec<PermissionGrant>>;

    /// Enumerate all identities, used for top-level root discovery.
    async fn list_identities(&self) -> StoreResult<Vec<Identity>>;
}

/// In-memory identity store.
///
/// This is suitable for single-process embedding and testing; durable
/// backends live with the collaborating store, behind the same trait.
/// Membership adjacency is held in both directions so that neither lookup
/// has to scan the full edge set.
///
/// # Examples
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), warden_identity::StoreError> {
/// use warden_identity::{Identity, IdentityStore, MemoryIdentityStore, ObjectType};
///
/// let store = MemoryIdentityStore::new();
/// let group = Identity::new(ObjectType::Group).with_fullname("Staff");
/// let user = Identity::new(ObjectType::User).with_firstname("Dana");
///
/// store.add_identity(group.clone()).await;
/// store.add_identity(user.clone()).await;
/// store.add_membership(user.object_id, group.object_id).await;
///
/// let parents = store.member_of(user.object_id).await?;
/// assert!(parents.contains(&group.object_id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    identities: HashMap<Uuid, Identity>,
    /// subject → containers (outgoing edges)
    member_of: HashMap<Uuid, BTreeSet<Uuid>>,
    /// container → members (incoming edges)
    members: HashMap<Uuid, BTreeSet<Uuid>>,
    grants: Vec<PermissionGrant>,
}

impl MemoryIdentityStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new in-memory store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add or replace an identity record.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity to store
    pub async fn add_identity(&self, identity: Identity) {
        let mut inner = self.inner.write().await;
        inner.identities.insert(identity.object_id, identity);
    }

    /// Add a membership edge.
    ///
    /// Duplicate edges collapse into the adjacency sets. Neither end is
    /// validated against the identity set: referential integrity is the
    /// provisioning flow's concern, and the traversals tolerate dangling
    /// references.
    ///
    /// # Arguments
    ///
    /// * `subject` - The member identity
    /// * `member_of` - The containing identity
    pub async fn add_membership(&self, subject: Uuid, member_of: Uuid) {
        let mut inner = self.inner.write().await;
        inner.member_of.entry(subject).or_default().insert(member_of);
        inner.members.entry(member_of).or_default().insert(subject);
    }

    /// Add a membership edge record.
    pub async fn add_edge(&self, edge: MembershipEdge) {
        self.add_membership(edge.subject, edge.member_of).await;
    }

    /// Add a permission grant.
    ///
    /// # Arguments
    ///
    /// * `grant` - The grant to store
    pub async fn add_grant(&self, grant: PermissionGrant) {
        let mut inner = self.inner.write().await;
        inner.grants.push(grant);
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get_identity(&self, object_id: Uuid) -> StoreResult<Identity> {
        let inner = self.inner.read().await;
        inner
            .identities
            .get(&object_id)
            .cloned()
            .ok_or(StoreError::IdentityNotFound { object_id })
    }

    async fn identities_by_email(&self, email: &str) -> StoreResult<Vec<Identity>> {
        let inner = self.inner.read().await;
        let mut matches: Vec<Identity> = inner
            .identities
            .values()
            .filter(|identity| identity.email.as_deref() == Some(email))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(StoreError::EmailNotFound {
                email: email.to_string(),
            });
        }

        // Stable order for callers that seed traversals per match.
        matches.sort_by_key(|identity| identity.object_id);
        Ok(matches)
    }

    async fn member_of(&self, object_id: Uuid) -> StoreResult<HashSet<Uuid>> {
        let inner = self.inner.read().await;
        if !inner.identities.contains_key(&object_id) {
            return Err(StoreError::IdentityNotFound { object_id });
        }
        Ok(inner
            .member_of
            .get(&object_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn members(&self, object_id: Uuid) -> StoreResult<HashSet<Uuid>> {
        let inner = self.inner.read().await;
        if !inner.identities.contains_key(&object_id) {
            return Err(StoreError::IdentityNotFound { object_id });
        }
        Ok(inner
            .members
            .get(&object_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn grants_for(
        &self,
        privilege: &str,
        identity_set: &HashSet<Uuid>,
        target: Uuid,
    ) -> StoreResult<Vec<PermissionGrant>> {
        let inner = self.inner.read().await;
        Ok(inner
            .grants
            .iter()
            .filter(|grant| {
                grant.privilege == privilege
                    && grant.target_object_id == target
                    && identity_set.contains(&grant.identity_object_id)
            })
            .cloned()
            .collect())
    }

    async fn list_identities(&self) -> StoreResult<Vec<Identity>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Identity> = inner.identities.values().cloned().collect();
        all.sort_by_key(|identity| identity.object_id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ObjectType;

    async fn seeded_store() -> (MemoryIdentityStore, Identity, Identity) {
        let store = MemoryIdentityStore::new();
        let group = Identity::new(ObjectType::Group).with_fullname("Staff");
        let user = Identity::new(ObjectType::User)
            .with_email("dana@example.org")
            .with_firstname("Dana");

        store.add_identity(group.clone()).await;
        store.add_identity(user.clone()).await;
        store.add_membership(user.object_id, group.object_id).await;

        (store, user, group)
    }

    #[tokio::test]
    async fn test_get_identity() {
        let (store, user, _) = seeded_store().await;

        let fetched = store.get_identity(user.object_id).await.unwrap();
        assert_eq!(fetched, user);

        let missing = store.get_identity(Uuid::now_v7()).await;
        assert!(matches!(
            missing,
            Err(StoreError::IdentityNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_email_lookup_returns_every_match() {
        let (store, user, _) = seeded_store().await;

        // Email is not unique: a second identity may share the address.
        let twin = Identity::new(ObjectType::User).with_email("dana@example.org");
        store.add_identity(twin.clone()).await;

        let matches = store.identities_by_email("dana@example.org").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().any(|i| i.object_id == user.object_id));
        assert!(matches.iter().any(|i| i.object_id == twin.object_id));

        let missing = store.identities_by_email("nobody@example.org").await;
        assert!(matches!(missing, Err(StoreError::EmailNotFound { .. })));
    }

    #[tokio::test]
    async fn test_edges_in_both_directions() {
        let (store, user, group) = seeded_store().await;

        let parents = store.member_of(user.object_id).await.unwrap();
        assert_eq!(parents, HashSet::from([group.object_id]));

        let children = store.members(group.object_id).await.unwrap();
        assert_eq!(children, HashSet::from([user.object_id]));

        // No edges is an empty set, not an error.
        assert!(store.member_of(group.object_id).await.unwrap().is_empty());
        assert!(store.members(user.object_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edge_lookup_for_unknown_identity_fails() {
        let (store, _, _) = seeded_store().await;
        let ghost = Uuid::now_v7();

        assert!(matches!(
            store.member_of(ghost).await,
            Err(StoreError::IdentityNotFound { .. })
        ));
        assert!(matches!(
            store.members(ghost).await,
            Err(StoreError::IdentityNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_edges_collapse() {
        let (store, user, group) = seeded_store().await;

        store.add_membership(user.object_id, group.object_id).await;
        store.add_membership(user.object_id, group.object_id).await;

        let parents = store.member_of(user.object_id).await.unwrap();
        assert_eq!(parents.len(), 1);
    }

    #[tokio::test]
    async fn test_grants_for_filters_on_all_three_keys() {
        let (store, user, group) = seeded_store().await;
        let target = Uuid::now_v7();
        let other_target = Uuid::now_v7();

        store
            .add_grant(PermissionGrant::new("read", group.object_id, target))
            .await;
        store
            .add_grant(PermissionGrant::new("admin", group.object_id, target))
            .await;
        store
            .add_grant(PermissionGrant::new("read", group.object_id, other_target))
            .await;

        let set = HashSet::from([user.object_id, group.object_id]);
        let grants = store.grants_for("read", &set, target).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].privilege, "read");
        assert_eq!(grants[0].target_object_id, target);

        // Identity outside the set does not match.
        let lone = HashSet::from([user.object_id]);
        assert!(store.grants_for("read", &lone, target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_identities_is_deterministic() {
        let (store, _, _) = seeded_store().await;

        let first = store.list_identities().await.unwrap();
        let second = store.list_identities().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
