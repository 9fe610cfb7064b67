//! Hierarchy rendering
//!
//! This module renders the membership graph as a deterministic, depth-marked
//! listing, rooted at a named identity, at every identity carrying an email,
//! or — when no root is given — at every top-level group.
//!
//! Unlike the closure engine's global visited set, expansion here is gated
//! per path: an identity reachable under two sibling parents appears once
//! under each of them (those are legitimately independent membership paths),
//! while an identity that would re-enter its own ancestor chain is pruned.
//! Termination on cyclic input follows from the path check alone.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use warden_identity::{Identity, IdentityStore, ObjectType, StoreError, StoreResult};

/// Type alias for boxed future to handle async recursion.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Rendering options.
///
/// # Examples
///
/// ```
/// use warden_graph::TreeOptions;
///
/// let options = TreeOptions::default();
/// assert_eq!(options.marker, '^');
/// assert!(!options.include_unaffiliated_users);
/// ```
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Depth marker character, repeated once per level in row labels
    pub marker: char,

    /// Treat user identities with no memberships as top-level roots in the
    /// root-less render. Off by default: only groups root the forest.
    pub include_unaffiliated_users: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            marker: '^',
            include_unaffiliated_users: false,
        }
    }
}

/// One row of a rendered hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeRow {
    /// Depth marker repeated `level` times, a space, then the display name
    pub label: String,

    /// The row identity's discriminator
    pub object_type: ObjectType,

    /// The row identity's email
    pub email: Option<String>,

    /// Depth below the row's root (0 = a root)
    pub level: u32,
}

/// A rendered hierarchy: ordered rows plus the count of references that
/// could not be resolved while descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tree {
    /// Rows in display order
    pub rows: Vec<TreeRow>,

    /// Distinct member references that pointed at no existing identity
    pub dangling_references: u64,
}

impl Tree {
    /// Number of rows in the rendering.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the rendering has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }
}

/// A row before final ordering: carries the display-name path used as the
/// primary sort key.
struct RowDraft {
    sort_path: Vec<String>,
    object_type: ObjectType,
    display_name: String,
    email: Option<String>,
    level: u32,
}

/// Deterministic hierarchy renderer over an identity store.
pub struct TreeRenderer<S> {
    store: Arc<S>,
    options: TreeOptions,
}

impl<S> Clone for TreeRenderer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options.clone(),
        }
    }
}

impl<S: IdentityStore> TreeRenderer<S> {
    /// Creates a renderer with default options.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_options(store, TreeOptions::default())
    }

    /// Creates a renderer with custom options.
    ///
    /// # Arguments
    ///
    /// * `store` - The identity store to read from
    /// * `options` - Rendering options
    pub fn with_options(store: Arc<S>, options: TreeOptions) -> Self {
        Self { store, options }
    }

    /// Render the hierarchy.
    ///
    /// With a root, renders that identity's subtree. Without one, renders a
    /// forest seeded from every top-level group (group-typed, not a member
    /// of anything); identities reachable from several roots appear once per
    /// root. The output ordering is stable across calls over an unchanged
    /// graph.
    ///
    /// # Arguments
    ///
    /// * `root` - Optional root identity
    ///
    /// # Returns
    ///
    /// The rendered tree, or `IdentityNotFound` when the named root does
    /// not exist.
    pub async fn render(&self, root: Option<Uuid>) -> StoreResult<Tree> {
        let roots = match root {
            Some(object_id) => vec![self.store.get_identity(object_id).await?],
            None => self.top_level_roots().await?,
        };
        self.render_from(roots).await
    }

    /// Render the hierarchy rooted at every identity carrying `email`.
    ///
    /// Email is not unique, so this seeds one subtree per matching identity.
    ///
    /// # Arguments
    ///
    /// * `email` - The root email to look up
    pub async fn render_rooted_at_email(&self, email: &str) -> StoreResult<Tree> {
        let roots = self.store.identities_by_email(email).await?;
        self.render_from(roots).await
    }

    /// Top-level roots: groups that are not members of anything, plus —
    /// when configured — users with no memberships.
    async fn top_level_roots(&self) -> StoreResult<Vec<Identity>> {
        let mut roots = Vec::new();
        for identity in self.store.list_identities().await? {
            let eligible = identity.object_type.is_group()
                || (self.options.include_unaffiliated_users
                    && identity.object_type == ObjectType::User);
            if !eligible {
                continue;
            }
            if self.store.member_of(identity.object_id).await?.is_empty() {
                roots.push(identity);
            }
        }
        Ok(roots)
    }

    async fn render_from(&self, roots: Vec<Identity>) -> StoreResult<Tree> {
        let mut drafts = Vec::new();
        let mut dangling: BTreeSet<Uuid> = BTreeSet::new();

        for root in roots {
            let (rows, skipped) = self.descend(root, 0, Vec::new(), Vec::new()).await?;
            drafts.extend(rows);
            dangling.extend(skipped);
        }

        // Display order: display-name path compared component-wise (siblings
        // group together and subtrees never interleave, even when names share
        // prefixes), then groups ahead of users, then display name.
        drafts.sort_by(|a, b| {
            a.sort_path
                .cmp(&b.sort_path)
                .then_with(|| a.object_type.cmp(&b.object_type))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let marker = self.options.marker.to_string();
        let rows = drafts
            .into_iter()
            .map(|draft| TreeRow {
                label: format!("{} {}", marker.repeat(draft.level as usize), draft.display_name),
                object_type: draft.object_type,
                email: draft.email,
                level: draft.level,
            })
            .collect();

        Ok(Tree {
            rows,
            dangling_references: dangling.len() as u64,
        })
    }

    /// Emit a row for `node`, then recurse into its direct members that are
    /// not already on the current ancestor path.
    fn descend<'a>(
        &'a self,
        node: Identity,
        level: u32,
        id_path: Vec<Uuid>,
        name_path: Vec<String>,
    ) -> BoxFuture<'a, StoreResult<(Vec<RowDraft>, BTreeSet<Uuid>)>> {
        Box::pin(async move {
            let display_name = node.display_name().to_string();

            let mut sort_path = name_path;
            sort_path.push(display_name.clone());

            let mut path = id_path;
            path.push(node.object_id);

            let mut rows = vec![RowDraft {
                sort_path: sort_path.clone(),
                object_type: node.object_type,
                display_name,
                email: node.email.clone(),
                level,
            }];
            let mut dangling: BTreeSet<Uuid> = BTreeSet::new();

            let mut children = Vec::new();
            for child_id in self.store.members(node.object_id).await? {
                if path.contains(&child_id) {
                    // Re-entering the ancestor chain; path-local pruning.
                    continue;
                }
                match self.store.get_identity(child_id).await {
                    Ok(identity) => children.push(identity),
                    Err(StoreError::IdentityNotFound { .. }) => {
                        dangling.insert(child_id);
                        warn!(
                            parent = %node.object_id,
                            object_id = %child_id,
                            "skipping dangling member reference"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
            children.sort_by(|a, b| {
                a.display_name()
                    .cmp(b.display_name())
                    .then_with(|| a.object_type.cmp(&b.object_type))
                    .then_with(|| a.object_id.cmp(&b.object_id))
            });

            for child in children {
                let (child_rows, child_dangling) = self
                    .descend(child, level + 1, path.clone(), sort_path.clone())
                    .await?;
                rows.extend(child_rows);
                dangling.extend(child_dangling);
            }

            Ok((rows, dangling))
        })
    }
}
