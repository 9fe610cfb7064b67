//! Membership edges
//!
//! A membership edge is the directed relation "subject is a direct member of
//! member_of". Edges may form cycles and may be duplicated; the closure
//! engine deduplicates and never loops, so neither situation is rejected
//! here. Referential integrity is the collaborating store's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed membership relation between two identities.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use warden_identity::MembershipEdge;
///
/// let user = Uuid::now_v7();
/// let group = Uuid::now_v7();
/// let edge = MembershipEdge::new(user, group);
/// assert_eq!(edge.subject, user);
/// assert_eq!(edge.member_of, group);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MembershipEdge {
    /// The identity that is a member
    pub subject: Uuid,

    /// The identity it is a direct member of
    pub member_of: Uuid,
}

impl MembershipEdge {
    /// Creates a new membership edge.
    ///
    /// # Arguments
    ///
    /// * `subject` - The member identity
    /// * `member_of` - The containing identity
    pub fn new(subject: Uuid, member_of: Uuid) -> Self {
        Self { subject, member_of }
    }
}
