//! Live Region Service Integration Tests
//!
//! The tokio drain-loop driver: events in, announcements out, Idle when
//! the queue empties, manager handed back on stop.

use std::sync::Arc;
use std::time::Duration;

use arialive::core::{service, ManagerConfig};
use arialive::{LiveEvent, LiveRegionManager, RecordingSpeech, SnapshotTree};

const PAGE: &str = "http://example.com/feed";

fn tree() -> SnapshotTree {
    SnapshotTree::from_json(
        r#"{
            "name": "document",
            "children": [
                {
                    "name": "Feed",
                    "attributes": {"id": "feed", "container-live": "polite"},
                    "children": [
                        {"attributes": {"id": "item-1"}, "text": "first item"},
                        {"attributes": {"id": "item-2"}, "text": "second item"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_events_are_drained_and_spoken() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());

    let handle = service::spawn(manager, Duration::from_millis(10));

    handle
        .send(LiveEvent::child_added(
            tree.require("feed").unwrap(),
            tree.require("item-1").unwrap(),
        ))
        .await
        .unwrap();

    // Give the drain loop a few ticks
    tokio::time::sleep(Duration::from_millis(100)).await;

    let spoken = speech.spoken();
    assert_eq!(spoken, vec![vec!["Feed".to_string(), "first item".to_string()]]);

    let manager = handle.stop().await.unwrap();
    assert_eq!(manager.queue_len(), 0);
}

#[tokio::test]
async fn test_service_goes_idle_and_drains_again() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());

    let handle = service::spawn(manager, Duration::from_millis(10));
    let feed = tree.require("feed").unwrap();

    handle
        .send(LiveEvent::child_added(feed.clone(), tree.require("item-1").unwrap()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(speech.spoken().len(), 1);

    // A second burst after the loop went idle must start draining again
    handle
        .send(LiveEvent::child_added(feed, tree.require("item-2").unwrap()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let spoken = speech.spoken();
    assert_eq!(spoken.len(), 2);
    assert_eq!(spoken[1], vec!["Feed".to_string(), "second item".to_string()]);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_returns_manager_with_session_state() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let manager = LiveRegionManager::new(PAGE, speech, ManagerConfig::default());
    let session_id = manager.session_id();

    let handle = service::spawn(manager, Duration::from_millis(10));
    handle
        .send(LiveEvent::child_added(
            tree.require("feed").unwrap(),
            tree.require("item-1").unwrap(),
        ))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The same manager comes back, ready for override persistence
    let manager = handle.stop().await.unwrap();
    assert_eq!(manager.session_id(), session_id);
    assert_eq!(manager.page_uri(), PAGE);
}
