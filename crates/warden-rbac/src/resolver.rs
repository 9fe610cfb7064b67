//! Permission resolution
//!
//! Resolution is a pure read over the store snapshot: compute the subject's
//! ancestor closure, fetch the candidate grants for the privilege and
//! target, and pass iff any grant is active at the evaluation instant.
//!
//! Targets are matched exactly: a grant on a group target does not
//! implicitly cover the group's members. Callers that want target-side
//! inheritance can resolve the target's ancestor closure themselves and
//! issue one check per ancestor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use warden_graph::ClosureEngine;
use warden_identity::{IdentityStore, PermissionGrant, StoreResult};

/// The outcome of a permission check.
///
/// `allowed` is the decision; the rest is observability. `matched` carries
/// one active grant that satisfied the check (there may be others — the
/// semantics are existential), and `dangling_references` surfaces
/// data-quality problems encountered while resolving the subject's closure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckDecision {
    /// Whether the subject holds the privilege on the target
    pub allowed: bool,

    /// An active grant that satisfied the check, when allowed
    pub matched: Option<PermissionGrant>,

    /// Dangling references skipped while computing the subject's closure
    pub dangling_references: u64,
}

/// Permission resolver over an identity store.
///
/// A cheap handle over `Arc<S>`; clones share the store and can resolve
/// concurrently without coordination.
pub struct PermissionResolver<S> {
    store: Arc<S>,
    closure: ClosureEngine<S>,
}

impl<S> Clone for PermissionResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            closure: self.closure.clone(),
        }
    }
}

impl<S: IdentityStore> PermissionResolver<S> {
    /// Creates a new permission resolver.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            closure: ClosureEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// Decide whether `subject` holds `privilege` on `target` at `now`.
    ///
    /// The subject's ancestor closure (itself plus every group it
    /// transitively belongs to) is matched against the grant records; the
    /// check passes iff at least one matching grant is active at `now`,
    /// with both window bounds inclusive.
    ///
    /// # Arguments
    ///
    /// * `subject` - The identity being checked
    /// * `privilege` - The privilege token, e.g. "read"
    /// * `target` - The object the privilege applies to (matched exactly)
    /// * `now` - The evaluation instant (UTC)
    ///
    /// # Returns
    ///
    /// The decision, or `IdentityNotFound` when `subject` does not exist.
    /// An absent grant is `allowed: false`, never an error.
    pub async fn check(
        &self,
        subject: Uuid,
        privilege: &str,
        target: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<CheckDecision> {
        let closure = self.closure.ancestors(subject).await?;
        let identity_set = closure.ids();

        let grants = self
            .store
            .grants_for(privilege, &identity_set, target)
            .await?;
        let matched = grants.into_iter().find(|grant| grant.is_active_at(now));

        let decision = CheckDecision {
            allowed: matched.is_some(),
            matched,
            dangling_references: closure.dangling_references,
        };

        debug!(
            subject = %subject,
            privilege = privilege,
            target = %target,
            allowed = decision.allowed,
            "permission check complete"
        );

        Ok(decision)
    }

    /// Boolean form of [`check`](Self::check).
    pub async fn has_permission(
        &self,
        subject: Uuid,
        privilege: &str,
        target: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Ok(self.check(subject, privilege, target, now).await?.allowed)
    }
}
