//! Identity domain model
//!
//! This module provides the identity record shared by users and groups.
//! Identities are the nodes of the membership graph; the engine only ever
//! reads them by object id, and provisioning stays with the external store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator for identity records.
///
/// Groups sort ahead of users wherever hierarchies are displayed, which is
/// why `Group` is the smaller variant.
///
/// # Examples
///
/// ```
/// use warden_identity::ObjectType;
///
/// assert_eq!(ObjectType::parse("group"), Some(ObjectType::Group));
/// assert_eq!(ObjectType::Group.as_str(), "group");
/// assert!(ObjectType::Group < ObjectType::User);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// A group or role; may contain members.
    Group = 0,

    /// An end-user identity.
    User = 1,
}

impl ObjectType {
    /// Get the string representation of the object type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::User => "user",
        }
    }

    /// Parse an object type from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(ObjectType)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "group" => Some(Self::Group),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Check whether this is the group discriminator.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

/// A user or group record in the identity graph.
///
/// `object_id` is the globally unique, stable key; every other field is
/// display metadata. Email is a human-facing secondary lookup key and is not
/// guaranteed unique by this crate (uniqueness enforcement belongs to the
/// collaborating store).
///
/// # Examples
///
/// ```
/// use warden_identity::{Identity, ObjectType};
///
/// let user = Identity::new(ObjectType::User)
///     .with_email("ada@example.org")
///     .with_firstname("Ada")
///     .with_lastname("Lovelace")
///     .with_fullname("Ada Lovelace");
///
/// assert_eq!(user.display_name(), "Ada Lovelace");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Globally unique stable identifier
    pub object_id: Uuid,

    /// Whether this identity is a user or a group
    pub object_type: ObjectType,

    /// When the identity was provisioned
    pub created: DateTime<Utc>,

    /// Email address (secondary lookup key, not unique)
    pub email: Option<String>,

    /// Given name
    pub firstname: Option<String>,

    /// Family name
    pub lastname: Option<String>,

    /// Full display name
    pub fullname: Option<String>,
}

impl Identity {
    /// Creates a new identity.
    ///
    /// The identity is created with:
    /// - A newly generated UUID v7 object id
    /// - Current timestamp for created
    /// - No display metadata
    ///
    /// # Arguments
    ///
    /// * `object_type` - Whether this is a user or a group
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_identity::{Identity, ObjectType};
    ///
    /// let group = Identity::new(ObjectType::Group);
    /// assert!(group.object_type.is_group());
    /// ```
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_id: Uuid::now_v7(),
            object_type,
            created: Utc::now(),
            email: None,
            firstname: None,
            lastname: None,
            fullname: None,
        }
    }

    /// Set the email address.
    ///
    /// # Arguments
    ///
    /// * `email` - The email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the given name.
    ///
    /// # Arguments
    ///
    /// * `firstname` - The given name
    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    /// Set the family name.
    ///
    /// # Arguments
    ///
    /// * `lastname` - The family name
    pub fn with_lastname(mut self, lastname: impl Into<String>) -> Self {
        self.lastname = Some(lastname.into());
        self
    }

    /// Set the full display name.
    ///
    /// # Arguments
    ///
    /// * `fullname` - The full display name
    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    /// The name used when rendering hierarchies: fullname when present,
    /// otherwise firstname, otherwise the empty string.
    pub fn display_name(&self) -> &str {
        self.fullname
            .as_deref()
            .or(self.firstname.as_deref())
            .unwrap_or_default()
    }
}
