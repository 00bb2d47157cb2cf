//! Integration tests for follow/mute/block edges.

mod common;

use crate::common::{create_post, edge_count, TestHarness};
use social_core::common::{SocialError, UserId};
use social_core::domains::engagement::like_post;
use social_core::domains::relations::{
    add_relation, list_incoming, list_outgoing, relation_state, remove_relation, RelationEdge,
    RelationKind, RelationOutcome, RelationRequest,
};
use test_context::test_context;

async fn kinds_between(ctx: &TestHarness, from: UserId, to: UserId) -> Vec<RelationKind> {
    let mut kinds = Vec::new();
    for kind in [RelationKind::Follow, RelationKind::Mute, RelationKind::Block] {
        if RelationEdge::find(from, to, kind, &ctx.db_pool)
            .await
            .unwrap()
            .is_some()
        {
            kinds.push(kind);
        }
    }
    kinds
}

// =============================================================================
// Add
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn follow_returns_both_users(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    let outcome = add_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();

    let users = outcome.into_users().expect("user snapshot");
    assert_eq!(users.logged_in_user.id, alice);
    assert_eq!(users.target_user.username, "bob");
    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Follow]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn block_replaces_follow(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    add_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Block]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn follow_replaces_block(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Follow]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn mute_coexists_with_follow_and_block(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    add_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(alice, bob, RelationKind::Mute), &ctx.deps)
        .await
        .unwrap();
    assert_eq!(
        kinds_between(ctx, alice, bob).await,
        vec![RelationKind::Follow, RelationKind::Mute]
    );

    add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();
    assert_eq!(
        kinds_between(ctx, alice, bob).await,
        vec![RelationKind::Mute, RelationKind::Block]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn edges_are_directional(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(bob, alice, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Block]);
    assert_eq!(kinds_between(ctx, bob, alice).await, vec![RelationKind::Follow]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn self_relation_is_rejected(ctx: &TestHarness) {
    let alice = ctx.user("alice");

    for kind in [RelationKind::Follow, RelationKind::Mute, RelationKind::Block] {
        let err = add_relation(RelationRequest::new(alice, alice, kind), &ctx.deps)
            .await
            .unwrap_err();
        match err {
            SocialError::Validation(msg) => assert_eq!(msg, format!("You cannot {} yourself", kind)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    assert_eq!(edge_count(&ctx.db_pool, alice, alice).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_follow_conflicts(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let request = RelationRequest::new(alice, bob, RelationKind::Follow);

    add_relation(request, &ctx.deps).await.unwrap();
    let err = add_relation(request, &ctx.deps).await.unwrap_err();

    assert!(matches!(err, SocialError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
    assert_eq!(edge_count(&ctx.db_pool, alice, bob).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_mute_names_the_relation(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let request = RelationRequest::new(alice, bob, RelationKind::Mute);

    add_relation(request, &ctx.deps).await.unwrap();
    let err = add_relation(request, &ctx.deps).await.unwrap_err();

    assert!(matches!(err, SocialError::Conflict(ref msg) if msg == "You are already muting this user"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_double_follow_leaves_one_edge(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let request = RelationRequest::new(alice, bob, RelationKind::Follow);

    let (first, second) = tokio::join!(
        add_relation(request, &ctx.deps),
        add_relation(request, &ctx.deps)
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(SocialError::Conflict(_)))));
    assert_eq!(edge_count(&ctx.db_pool, alice, bob).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_follow_and_block_keep_exclusion(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    let (follow, block) = tokio::join!(
        add_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps),
        add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
    );

    let results = [follow, block];
    assert!(results.iter().any(|r| r.is_ok()));
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, SocialError::Conflict(_)), "unexpected error: {err:?}");
        }
    }

    let kinds = kinds_between(ctx, alice, bob).await;
    assert_eq!(kinds.len(), 1);
    assert!(matches!(kinds[0], RelationKind::Follow | RelationKind::Block));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn racing_opposite_insert_reports_concurrent_change(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");

    // An uncommitted follow holds the exclusive index slot for the pair
    let mut holder = ctx.db_pool.begin().await.unwrap();
    RelationEdge::insert(alice, bob, RelationKind::Follow, &mut holder)
        .await
        .unwrap();

    let block = tokio::spawn({
        let deps = ctx.deps.clone();
        async move {
            add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &deps).await
        }
    });

    // Give the block time to reach the index and wait on the holder
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    holder.commit().await.unwrap();

    let err = block.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        SocialError::Conflict(ref msg) if msg == "Relationship with this user changed concurrently"
    ));
    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Follow]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_users_are_not_found(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let ghost = UserId::new();

    let err = add_relation(RelationRequest::new(ghost, alice, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, SocialError::NotFound(ref msg) if msg == "Logged in user not found"));

    let err = add_relation(RelationRequest::new(alice, ghost, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, SocialError::NotFound(ref msg) if msg == "User not found"));
    assert_eq!(edge_count(&ctx.db_pool, alice, ghost).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_post_aborts_before_any_write(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let request = RelationRequest::new(alice, bob, RelationKind::Follow)
        .with_post(social_core::common::PostId::new());

    let err = add_relation(request, &ctx.deps).await.unwrap_err();

    assert!(matches!(err, SocialError::NotFound(ref msg) if msg == "Post not found"));
    assert_eq!(edge_count(&ctx.db_pool, alice, bob).await.unwrap(), 0);
}

// =============================================================================
// Remove
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn remove_without_edge_is_not_found(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    add_relation(RelationRequest::new(alice, bob, RelationKind::Mute), &ctx.deps)
        .await
        .unwrap();

    let err = remove_relation(RelationRequest::new(alice, bob, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap_err();

    assert!(matches!(err, SocialError::NotFound(ref msg) if msg == "You are not following this user"));
    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Mute]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn remove_deletes_only_that_kind(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    add_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(alice, bob, RelationKind::Mute), &ctx.deps)
        .await
        .unwrap();

    remove_relation(RelationRequest::new(alice, bob, RelationKind::Block), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(kinds_between(ctx, alice, bob).await, vec![RelationKind::Mute]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unfollow_with_post_reports_refreshed_author_state(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let post = create_post(&ctx.db_pool, bob).await.unwrap();
    like_post(post.id, alice, &ctx.deps).await.unwrap();

    let followed = add_relation(
        RelationRequest::new(alice, bob, RelationKind::Follow).with_post(post.id),
        &ctx.deps,
    )
    .await
    .unwrap()
    .into_post()
    .expect("post view");
    assert!(followed.created_by.is_following);

    let outcome = remove_relation(
        RelationRequest::new(alice, bob, RelationKind::Follow).with_post(post.id),
        &ctx.deps,
    )
    .await
    .unwrap();

    let RelationOutcome::Post(view) = outcome else {
        panic!("expected post view");
    };
    assert_eq!(view.id, post.id);
    assert_eq!(view.created_by.id, bob);
    assert_eq!(view.created_by.username.as_deref(), Some("bob"));
    assert!(!view.created_by.is_following);
    assert!(!view.logged_in_user_action_state.is_following);
    assert!(view.logged_in_user_action_state.is_liked);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_double_remove_succeeds_once(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let request = RelationRequest::new(alice, bob, RelationKind::Follow);
    add_relation(request, &ctx.deps).await.unwrap();

    let (first, second) = tokio::join!(
        remove_relation(request, &ctx.deps),
        remove_relation(request, &ctx.deps)
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(SocialError::NotFound(_)))));
    assert_eq!(edge_count(&ctx.db_pool, alice, bob).await.unwrap(), 0);
}

// =============================================================================
// Reads
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn followers_and_following_lists(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let carol = ctx.user("carol");

    add_relation(RelationRequest::new(alice, carol, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();
    add_relation(RelationRequest::new(bob, carol, RelationKind::Follow), &ctx.deps)
        .await
        .unwrap();

    let mut followers = list_incoming(carol, RelationKind::Follow, 10, 0, &ctx.deps)
        .await
        .unwrap();
    followers.sort();
    let mut expected = vec![alice, bob];
    expected.sort();
    assert_eq!(followers, expected);

    let following = list_outgoing(alice, RelationKind::Follow, 10, 0, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(following, vec![carol]);

    let count = RelationEdge::count_incoming(carol, RelationKind::Follow, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn relation_state_reflects_edges(ctx: &TestHarness) {
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    add_relation(RelationRequest::new(alice, bob, RelationKind::Mute), &ctx.deps)
        .await
        .unwrap();

    let state = relation_state(alice, bob, &ctx.deps).await.unwrap();
    assert!(state.is_muted);
    assert!(!state.is_following);
    assert!(!state.is_blocked);

    let reverse = relation_state(bob, alice, &ctx.deps).await.unwrap();
    assert!(!reverse.is_muted);
}
