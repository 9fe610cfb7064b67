//! End-to-end tests for identity-graph access resolution.
//!
//! These tests build one realistic organization graph — nested groups, a
//! membership cycle, a dangling edge, time-windowed grants — and drive the
//! closure engine, tree renderer, and permission resolver against it
//! together, the way an embedding service would.
//!
//! Graph under test:
//!
//! ```text
//! Everyone (top-level group)
//!   └─ Staff
//!       ├─ Engineering ⇄ Platform   (cycle between the two groups)
//!       │     └─ Ada
//!       └─ Ben
//! plus: Staff → ghost id            (dangling membership edge)
//! ```

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;
use warden_graph::{ClosureEngine, TreeRenderer};
use warden_identity::{Identity, MemoryIdentityStore, ObjectType, PermissionGrant};
use warden_rbac::PermissionResolver;

/// Test fixture holding the shared store and the identities of interest.
struct TestFixture {
    store: Arc<MemoryIdentityStore>,
    everyone: Identity,
    staff: Identity,
    engineering: Identity,
    platform: Identity,
    ada: Identity,
    ben: Identity,
    ghost: Uuid,
    handbook: Uuid,
}

impl TestFixture {
    /// Create the fixture graph.
    async fn new() -> Self {
        let store = MemoryIdentityStore::new_shared();

        let everyone = Identity::new(ObjectType::Group).with_fullname("Everyone");
        let staff = Identity::new(ObjectType::Group).with_fullname("Staff");
        let engineering = Identity::new(ObjectType::Group).with_fullname("Engineering");
        let platform = Identity::new(ObjectType::Group).with_fullname("Platform");
        let ada = Identity::new(ObjectType::User)
            .with_firstname("Ada")
            .with_email("ada@example.org");
        let ben = Identity::new(ObjectType::User)
            .with_firstname("Ben")
            .with_email("ben@example.org");

        for identity in [&everyone, &staff, &engineering, &platform, &ada, &ben] {
            store.add_identity(identity.clone()).await;
        }

        store.add_membership(staff.object_id, everyone.object_id).await;
        store.add_membership(engineering.object_id, staff.object_id).await;
        store.add_membership(ben.object_id, staff.object_id).await;
        store.add_membership(ada.object_id, engineering.object_id).await;

        // Cycle: Engineering ⇄ Platform.
        store
            .add_membership(platform.object_id, engineering.object_id)
            .await;
        store
            .add_membership(engineering.object_id, platform.object_id)
            .await;

        // Dangling membership edge under Staff.
        let ghost = Uuid::now_v7();
        store.add_membership(ghost, staff.object_id).await;

        Self {
            store,
            everyone,
            staff,
            engineering,
            platform,
            ada,
            ben,
            ghost,
            handbook: Uuid::now_v7(),
        }
    }

    fn engine(&self) -> ClosureEngine<MemoryIdentityStore> {
        ClosureEngine::new(Arc::clone(&self.store))
    }

    fn renderer(&self) -> TreeRenderer<MemoryIdentityStore> {
        TreeRenderer::new(Arc::clone(&self.store))
    }

    fn resolver(&self) -> PermissionResolver<MemoryIdentityStore> {
        PermissionResolver::new(Arc::clone(&self.store))
    }
}

fn at(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_ancestor_closure_through_cycle() {
    let f = TestFixture::new().await;

    let closure = f.engine().ancestors(f.ada.object_id).await.unwrap();

    // Ada → Engineering → {Staff, Platform} → Everyone; the cycle back into
    // Engineering adds nothing and nothing loops.
    assert_eq!(closure.len(), 5);
    assert_eq!(closure.level_of(f.ada.object_id), Some(0));
    assert_eq!(closure.level_of(f.engineering.object_id), Some(1));
    assert_eq!(closure.level_of(f.staff.object_id), Some(2));
    assert_eq!(closure.level_of(f.platform.object_id), Some(2));
    assert_eq!(closure.level_of(f.everyone.object_id), Some(3));
}

#[tokio::test]
async fn test_descendant_closure_reports_dangling_edge() {
    let f = TestFixture::new().await;

    let closure = f.engine().descendants(f.everyone.object_id).await.unwrap();

    assert_eq!(closure.len(), 6);
    assert_eq!(closure.level_of(f.ada.object_id), Some(3));
    assert!(!closure.contains(f.ghost));
    assert_eq!(closure.dangling_references, 1);
}

#[tokio::test]
async fn test_forest_render_is_cycle_safe_and_stable() {
    let f = TestFixture::new().await;
    let renderer = f.renderer();

    let tree = renderer.render(None).await.unwrap();

    // Everyone is the only top-level group (every other group is a member of
    // something). Engineering and Platform each appear under the other once;
    // neither path re-enters itself.
    assert_eq!(
        tree.labels(),
        vec![
            " Everyone",
            "^ Staff",
            "^^ Ben",
            "^^ Engineering",
            "^^^ Ada",
            "^^^ Platform",
        ]
    );
    assert_eq!(tree.dangling_references, 1);

    // Stable across repeated renders of the unchanged graph.
    let again = renderer.render(None).await.unwrap();
    assert_eq!(tree, again);
}

#[tokio::test]
async fn test_email_rooted_render() {
    let f = TestFixture::new().await;

    let tree = f
        .renderer()
        .render_rooted_at_email("ada@example.org")
        .await
        .unwrap();
    assert_eq!(tree.labels(), vec![" Ada"]);
}

#[tokio::test]
async fn test_permission_inherited_across_the_whole_chain() {
    let f = TestFixture::new().await;
    f.store
        .add_grant(
            PermissionGrant::new("read", f.everyone.object_id, f.handbook)
                .with_window(at(2000), at(3000)),
        )
        .await;

    let resolver = f.resolver();

    // Ada inherits through Engineering → Staff → Everyone.
    assert!(resolver
        .has_permission(f.ada.object_id, "read", f.handbook, at(2025))
        .await
        .unwrap());

    // Ben inherits through Staff → Everyone.
    assert!(resolver
        .has_permission(f.ben.object_id, "read", f.handbook, at(2025))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_permission_through_cycle_member() {
    let f = TestFixture::new().await;

    // Grant to Platform; Ada reaches it through the Engineering ⇄ Platform
    // cycle.
    f.store
        .add_grant(PermissionGrant::new("deploy", f.platform.object_id, f.handbook))
        .await;

    assert!(f
        .resolver()
        .has_permission(f.ada.object_id, "deploy", f.handbook, at(2025))
        .await
        .unwrap());

    // Ben is not inside the cycle and does not inherit it.
    assert!(!f
        .resolver()
        .has_permission(f.ben.object_id, "deploy", f.handbook, at(2025))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_expired_and_future_windows_deny() {
    let f = TestFixture::new().await;
    f.store
        .add_grant(
            PermissionGrant::new("read", f.staff.object_id, f.handbook)
                .with_window(at(2000), at(2020)),
        )
        .await;
    f.store
        .add_grant(
            PermissionGrant::new("read", f.staff.object_id, f.handbook)
                .with_window(at(2030), at(2040)),
        )
        .await;

    let resolver = f.resolver();
    assert!(!resolver
        .has_permission(f.ben.object_id, "read", f.handbook, at(2025))
        .await
        .unwrap());

    // The same grants decide differently at instants inside their windows.
    assert!(resolver
        .has_permission(f.ben.object_id, "read", f.handbook, at(2010))
        .await
        .unwrap());
    assert!(resolver
        .has_permission(f.ben.object_id, "read", f.handbook, at(2035))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_decision_surfaces_dangling_count() {
    let f = TestFixture::new().await;

    // Ben's ancestor chain passes Staff, whose member edge to the ghost id
    // is on the descendant side only; his upward closure is clean.
    let clean = f
        .resolver()
        .check(f.ben.object_id, "read", f.handbook, at(2025))
        .await
        .unwrap();
    assert_eq!(clean.dangling_references, 0);

    // Point Ben at a missing group: the check still completes and the skip
    // is observable on the decision.
    f.store.add_membership(f.ben.object_id, Uuid::now_v7()).await;
    let flagged = f
        .resolver()
        .check(f.ben.object_id, "read", f.handbook, at(2025))
        .await
        .unwrap();
    assert_eq!(flagged.dangling_references, 1);
    assert!(!flagged.allowed);
}

#[tokio::test]
async fn test_concurrent_queries_share_one_store() {
    let f = TestFixture::new().await;
    f.store
        .add_grant(PermissionGrant::new("read", f.everyone.object_id, f.handbook))
        .await;

    let resolver = f.resolver();
    let engine = f.engine();
    let renderer = f.renderer();

    // Closure, tree, and permission queries are pure reads; run them all at
    // once against the same snapshot.
    let (closure, tree, allowed) = tokio::join!(
        engine.ancestors(f.ada.object_id),
        renderer.render(None),
        resolver.has_permission(f.ada.object_id, "read", f.handbook, at(2025)),
    );

    assert_eq!(closure.unwrap().len(), 5);
    assert_eq!(tree.unwrap().len(), 6);
    assert!(allowed.unwrap());
}
