//! Politeness Override Integration Tests
//!
//! The advance cycle, override-aware classification, and persistence of
//! the override map across sessions.

use std::sync::Arc;

use arialive::core::ManagerConfig;
use arialive::{
    LiveEvent, LiveRegionManager, OverrideStore, RecordingSpeech, SnapshotTree,
};
use tempfile::TempDir;

const PAGE: &str = "http://example.com/scores";

fn tree() -> SnapshotTree {
    SnapshotTree::from_json(
        r#"{
            "name": "document",
            "children": [
                {
                    "name": "Scores",
                    "attributes": {"id": "scores", "container-live": "polite"},
                    "children": [
                        {"attributes": {"id": "scores-line"}, "text": "3 to 1"}
                    ]
                },
                {
                    "attributes": {"id": "quiet"},
                    "children": [
                        {"attributes": {"id": "quiet-line"}, "text": "background noise"}
                    ]
                },
                {
                    "attributes": {"id": "described", "container-live": "polite"},
                    "described_by": ["legend"],
                    "text": "live scores"
                },
                {"attributes": {"id": "legend"}, "text": "Match score panel"}
            ]
        }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_advance_cycles_through_all_levels() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());
    let quiet = tree.require("quiet").unwrap();

    // Starting from no markup and no override: none -> polite -> assertive
    // -> rude -> off -> polite
    manager.advance_politeness(&quiet).await;
    manager.advance_politeness(&quiet).await;
    manager.advance_politeness(&quiet).await;
    manager.advance_politeness(&quiet).await;
    manager.advance_politeness(&quiet).await;

    assert_eq!(
        speech.messages(),
        vec![
            "Setting live region to polite",
            "Setting live region to assertive",
            "Setting live region to rude",
            "Setting live region to off",
            "Setting live region to polite",
        ]
    );
}

#[tokio::test]
async fn test_advance_without_id_is_reported_not_thrown() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());

    // The document root carries no id attribute
    let root = tree.root();
    manager.advance_politeness(&root).await;

    assert_eq!(
        speech.messages(),
        vec!["Object does not have an id, cannot override live region priority"]
    );
}

#[tokio::test]
async fn test_override_changes_event_classification() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());
    let quiet = tree.require("quiet").unwrap();

    // Unmarked region: dropped
    let event = LiveEvent::child_added(quiet.clone(), tree.require("quiet-line").unwrap());
    assert!(!manager.handle_event(&event).await);

    // After an override to polite, the same event queues
    manager.advance_politeness(&quiet).await;
    assert!(manager.handle_event(&event).await);
    assert_eq!(manager.queue_len(), 1);
}

#[tokio::test]
async fn test_overrides_survive_a_session_restart() {
    let tree = tree();
    let temp = TempDir::new().unwrap();
    let store = OverrideStore::new(temp.path());

    // First session: silence the scores region (polite -> assertive -> rude
    // -> off) and save on teardown
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech, ManagerConfig::default());
    let scores = tree.require("scores").unwrap();
    manager.advance_politeness(&scores).await;
    manager.advance_politeness(&scores).await;
    manager.advance_politeness(&scores).await;
    store.save(PAGE, manager.overrides()).await.unwrap();

    // Second session: the override is loaded and still silences the region
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());
    manager.set_overrides(store.load(PAGE).await.unwrap());

    let event = LiveEvent::child_added(scores, tree.require("scores-line").unwrap());
    assert!(!manager.handle_event(&event).await);
    assert_eq!(manager.queue_len(), 0);
}

#[tokio::test]
async fn test_live_region_description() {
    let tree = tree();
    let speech = Arc::new(RecordingSpeech::new());
    let mut manager = LiveRegionManager::new(PAGE, speech.clone(), ManagerConfig::default());
    let described = tree.require("described").unwrap();

    // With no override, the relation text still makes it worth describing
    let parts = manager.live_region_description(&described);
    assert_eq!(parts, vec!["Match score panel", "politeness level none"]);

    manager.advance_politeness(&described).await; // polite -> assertive
    manager.output_live_region_description(&described).await;
    assert_eq!(
        speech.messages().last().unwrap(),
        "Match score panel politeness level assertive"
    );
}
