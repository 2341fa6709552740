//! Tests for `ChangeNotifier` fan-out.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use chrono::Utc;
use vitals_api::notifications::ChangeNotifier;
use vitals_api::ws::{ServerMessage, SubscriptionRegistry};
use vitals_core::severity::Severity;
use vitals_core::vitals::VitalPayload;
use vitals_events::{EventBus, VitalEvent};

fn payload(heart_rate: i32, severity: Severity) -> VitalPayload {
    VitalPayload {
        heart_rate,
        systolic: 115,
        diastolic: 75,
        oxygen_saturation: 98,
        measured_at: Some(Utc::now()),
        severity,
    }
}

fn decode(message: Message) -> ServerMessage {
    match message {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn on_persisted_targets_only_the_patient_group() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let mut watcher = registry.add("watcher".to_string()).await;
    let mut bystander = registry.add("bystander".to_string()).await;
    registry.join("watcher", 1).await;
    registry.join("bystander", 2).await;

    let notifier = ChangeNotifier::new(Arc::clone(&registry));
    let delivered = notifier
        .on_persisted(&VitalEvent::created(10, 1, payload(72, Severity::Normal)))
        .await;

    assert_eq!(delivered, 1);
    match decode(watcher.recv().await.unwrap()) {
        ServerMessage::ReceiveVital { patient_id, vital } => {
            assert_eq!(patient_id, 1);
            assert_eq!(vital.heart_rate, 72);
            assert_eq!(vital.severity, Severity::Normal);
        }
        other => panic!("unexpected frame {other:?}"),
    }
    assert!(bystander.try_recv().is_err());
}

#[tokio::test]
async fn updates_are_pushed_like_creates() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let mut rx = registry.add("conn".to_string()).await;
    registry.join("conn", 3).await;

    let notifier = ChangeNotifier::new(Arc::clone(&registry));
    notifier
        .on_persisted(&VitalEvent::updated(4, 3, payload(125, Severity::Critical)))
        .await;

    let frame = decode(rx.recv().await.unwrap());
    assert!(matches!(
        frame,
        ServerMessage::ReceiveVital { patient_id: 3, ref vital } if vital.severity == Severity::Critical
    ));
}

#[tokio::test]
async fn run_forwards_bus_events_and_stops_when_bus_dropped() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let mut rx = registry.add("conn".to_string()).await;
    registry.join("conn", 1).await;

    let bus = EventBus::default();
    let handle = tokio::spawn(ChangeNotifier::new(Arc::clone(&registry)).run(bus.subscribe()));

    bus.publish(VitalEvent::created(1, 1, payload(70, Severity::Normal)));
    bus.publish(VitalEvent::created(2, 1, payload(110, Severity::Warning)));

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(decode(first), ServerMessage::ReceiveVital { ref vital, .. } if vital.heart_rate == 70));
    assert!(matches!(decode(second), ServerMessage::ReceiveVital { ref vital, .. } if vital.heart_rate == 110));

    drop(bus);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("notifier should exit once the bus is closed")
        .unwrap();
}

#[tokio::test]
async fn late_joiner_misses_earlier_readings() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let mut rx = registry.add("conn".to_string()).await;
    let notifier = ChangeNotifier::new(Arc::clone(&registry));

    notifier
        .on_persisted(&VitalEvent::created(1, 1, payload(70, Severity::Normal)))
        .await;
    registry.join("conn", 1).await;

    assert!(rx.try_recv().is_err());
}
