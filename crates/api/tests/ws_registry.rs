//! Tests for `SubscriptionRegistry`.
//!
//! These exercise the registry directly, without performing any HTTP
//! upgrades. They verify group membership, targeted publish and shutdown.

use axum::extract::ws::Message;
use vitals_api::ws::SubscriptionRegistry;

fn text(body: &str) -> Message {
    Message::Text(body.to_string().into())
}

// ---------------------------------------------------------------------------
// Connection bookkeeping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_registry_has_zero_connections() {
    let registry = SubscriptionRegistry::new();

    assert_eq!(registry.connection_count().await, 0);
    assert_eq!(registry.group_size(1).await, 0);
}

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let registry = SubscriptionRegistry::new();

    let _rx = registry.add("conn-1".to_string()).await;
    registry.remove("nonexistent").await;

    assert_eq!(registry.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Group membership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn join_is_idempotent() {
    let registry = SubscriptionRegistry::new();
    let _rx = registry.add("conn-1".to_string()).await;

    assert!(registry.join("conn-1", 5).await);
    assert!(!registry.join("conn-1", 5).await);
    assert_eq!(registry.group_size(5).await, 1);
}

#[tokio::test]
async fn join_unknown_connection_is_rejected() {
    let registry = SubscriptionRegistry::new();

    assert!(!registry.join("ghost", 5).await);
    assert_eq!(registry.group_size(5).await, 0);
}

#[tokio::test]
async fn leave_without_membership_returns_false() {
    let registry = SubscriptionRegistry::new();
    let _rx = registry.add("conn-1".to_string()).await;

    assert!(!registry.leave("conn-1", 5).await);
}

#[tokio::test]
async fn one_channel_may_join_many_groups() {
    let registry = SubscriptionRegistry::new();
    let _rx = registry.add("conn-1".to_string()).await;

    registry.join("conn-1", 9).await;
    registry.join("conn-1", 2).await;

    assert_eq!(registry.groups_of("conn-1").await, vec![2, 9]);
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn member_receives_exactly_one_copy() {
    let registry = SubscriptionRegistry::new();
    let mut rx = registry.add("conn-1".to_string()).await;
    registry.join("conn-1", 1).await;

    let delivered = registry.publish(1, text("reading")).await;

    assert_eq!(delivered, 1);
    assert_eq!(rx.recv().await, Some(text("reading")));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn non_member_receives_nothing() {
    let registry = SubscriptionRegistry::new();
    let mut member = registry.add("member".to_string()).await;
    let mut other = registry.add("other".to_string()).await;
    registry.join("member", 1).await;
    registry.join("other", 2).await;

    assert_eq!(registry.publish(1, text("for-1")).await, 1);

    assert_eq!(member.recv().await, Some(text("for-1")));
    assert!(other.try_recv().is_err());
}

#[tokio::test]
async fn publish_to_empty_group_delivers_to_nobody() {
    let registry = SubscriptionRegistry::new();
    let mut rx = registry.add("conn-1".to_string()).await;

    assert_eq!(registry.publish(42, text("lost")).await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn left_channel_stops_receiving() {
    let registry = SubscriptionRegistry::new();
    let mut rx = registry.add("conn-1".to_string()).await;
    registry.join("conn-1", 1).await;

    assert!(registry.leave("conn-1", 1).await);
    assert_eq!(registry.publish(1, text("after-leave")).await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn closed_channel_is_skipped() {
    let registry = SubscriptionRegistry::new();
    let rx = registry.add("conn-1".to_string()).await;
    let mut live = registry.add("conn-2".to_string()).await;
    registry.join("conn-1", 1).await;
    registry.join("conn-2", 1).await;
    drop(rx);

    assert_eq!(registry.publish(1, text("hello")).await, 1);
    assert_eq!(live.recv().await, Some(text("hello")));
}

// ---------------------------------------------------------------------------
// Disconnect and shutdown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_drops_every_membership() {
    let registry = SubscriptionRegistry::new();
    let _rx = registry.add("conn-1".to_string()).await;
    registry.join("conn-1", 1).await;
    registry.join("conn-1", 2).await;

    registry.remove("conn-1").await;

    assert_eq!(registry.connection_count().await, 0);
    assert_eq!(registry.group_size(1).await, 0);
    assert_eq!(registry.group_size(2).await, 0);
    assert!(registry.groups_of("conn-1").await.is_empty());
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let registry = SubscriptionRegistry::new();
    let mut rx1 = registry.add("conn-1".to_string()).await;
    let mut rx2 = registry.add("conn-2".to_string()).await;
    registry.join("conn-1", 1).await;

    registry.shutdown_all().await;

    assert_eq!(registry.connection_count().await, 0);
    assert_eq!(registry.group_size(1).await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let registry = SubscriptionRegistry::new();
    let mut rx = registry.add("conn-1".to_string()).await;

    assert_eq!(registry.ping_all().await, 0);

    assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn ping_all_drops_stale_channels() {
    let registry = SubscriptionRegistry::new();
    let gone = registry.add("gone".to_string()).await;
    let _live = registry.add("live".to_string()).await;
    registry.join("gone", 1).await;
    registry.join("live", 1).await;
    registry.join("gone", 2).await;
    drop(gone);

    assert_eq!(registry.ping_all().await, 1);

    assert_eq!(registry.connection_count().await, 1);
    assert_eq!(registry.group_size(1).await, 1);
    assert_eq!(registry.group_size(2).await, 0);
}
