//! Permission grants
//!
//! A grant asserts that an identity holds a privilege on a target during a
//! validity window. Both window bounds are always populated: a grant created
//! without an explicit window is open from a far-past to a far-future
//! sentinel, and activity checks are inclusive on both ends.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Start of the open validity window (2000-01-01T00:00:00Z).
pub fn window_open_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// End of the open validity window (3000-01-01T00:00:00Z).
pub fn window_open_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap()
}

/// A time-windowed assertion that an identity holds a privilege on a target.
///
/// Grants are immutable facts at query time; they are created and expired by
/// external administrative action. Multiple simultaneously active grants for
/// the same privilege are permitted and do not conflict.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use uuid::Uuid;
/// use warden_identity::PermissionGrant;
///
/// let grant = PermissionGrant::new("read", Uuid::now_v7(), Uuid::now_v7());
/// assert!(grant.is_active_at(Utc::now()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionGrant {
    /// Short privilege token, e.g. "read" or "admin"
    pub privilege: String,

    /// The identity holding the privilege (directly, or inherited by its
    /// transitive members)
    pub identity_object_id: Uuid,

    /// The object the privilege applies to
    pub target_object_id: Uuid,

    /// Start of the validity window (inclusive)
    pub starts: DateTime<Utc>,

    /// End of the validity window (inclusive)
    pub ends: DateTime<Utc>,
}

impl PermissionGrant {
    /// Creates a grant with the open validity window.
    ///
    /// # Arguments
    ///
    /// * `privilege` - The privilege token
    /// * `identity_object_id` - The identity holding the privilege
    /// * `target_object_id` - The target object
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use warden_identity::PermissionGrant;
    ///
    /// let grant = PermissionGrant::new("admin", Uuid::now_v7(), Uuid::now_v7());
    /// assert_eq!(grant.privilege, "admin");
    /// ```
    pub fn new(
        privilege: impl Into<String>,
        identity_object_id: Uuid,
        target_object_id: Uuid,
    ) -> Self {
        Self {
            privilege: privilege.into(),
            identity_object_id,
            target_object_id,
            starts: window_open_start(),
            ends: window_open_end(),
        }
    }

    /// Set an explicit validity window.
    ///
    /// # Arguments
    ///
    /// * `starts` - Start of the window (inclusive)
    /// * `ends` - End of the window (inclusive)
    pub fn with_window(mut self, starts: DateTime<Utc>, ends: DateTime<Utc>) -> Self {
        self.starts = starts;
        self.ends = ends;
        self
    }

    /// Check whether the grant is active at the given instant.
    ///
    /// Both window bounds are inclusive: a grant with
    /// `starts == ends == now` is active.
    ///
    /// # Arguments
    ///
    /// * `now` - The evaluation instant (UTC)
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.starts <= now && now <= self.ends
    }
}
