//! The event-to-speech pipeline for one page session.
//!
//! `LiveRegionManager` owns the queue, the politeness resolver and the
//! review cache. `handle_event` classifies and enqueues; `pump_messages`
//! drains one announcement per tick while the speech engine is idle. The
//! manager itself never schedules anything: the embedding (the service
//! loop, or the replay CLI) starts ticking when `handle_event` reports the
//! queue went non-empty and stops when the pump reports `Idle`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::accessible::{find_live_regions, AccessibleRef, Attributes};
use crate::domain::{LiveEvent, LiveEventKind, Message, PolitenessLevel, EMBEDDED_OBJECT_CHAR};
use crate::messages;
use crate::speech::Speech;

use super::cache::{MessageCache, DEFAULT_CACHE_SIZE};
use super::queue::PriorityQueue;
use super::resolver::{PolitenessOverrides, PolitenessResolver};

/// Tunables for one manager instance.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// How long an entry may wait in the queue before it is discarded.
    pub keep_alive: Duration,

    /// Capacity of the review cache.
    pub cache_size: usize,

    /// Master switch for live region support. When off, the user-facing
    /// commands announce that support is off instead of acting.
    pub infer_live_regions: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(5),
            cache_size: DEFAULT_CACHE_SIZE,
            infer_live_regions: true,
        }
    }
}

/// What the drain callback wants the scheduler to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// Queue still has entries; keep ticking.
    Continue,

    /// Queue drained; stop ticking until the next event.
    Idle,
}

/// Live-region manager for one page session.
pub struct LiveRegionManager {
    session_id: Uuid,
    config: ManagerConfig,
    queue: PriorityQueue,
    resolver: PolitenessResolver,
    cache: MessageCache,
    speech: Arc<dyn Speech>,
    last_live: Option<AccessibleRef>,
    infer_live_regions: bool,
}

impl LiveRegionManager {
    pub fn new(page_uri: impl Into<String>, speech: Arc<dyn Speech>, config: ManagerConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            queue: PriorityQueue::new(),
            resolver: PolitenessResolver::new(page_uri),
            cache: MessageCache::new(config.cache_size),
            speech,
            last_live: None,
            infer_live_regions: config.infer_live_regions,
            config,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn page_uri(&self) -> &str {
        self.resolver.page_uri()
    }

    /// Pending announcements.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The override map, for persistence at session end.
    pub fn overrides(&self) -> &PolitenessOverrides {
        self.resolver.overrides()
    }

    /// Install overrides loaded from the bookmarks store.
    pub fn set_overrides(&mut self, overrides: PolitenessOverrides) {
        self.resolver.set_overrides(overrides);
    }

    /// Drop stale `None` registrations that belong to other pages.
    pub fn reset(&mut self) {
        self.resolver.reset();
    }

    /// Handle one live-region change event. Events are dropped outright
    /// while the master live-region switch is off.
    ///
    /// Returns `true` when the queue went from empty to non-empty, which is
    /// the embedding's cue to start the drain ticks (Idle → Draining).
    #[instrument(skip(self, event), fields(session = %self.session_id, event_type = event.type_str()))]
    pub async fn handle_event(&mut self, event: &LiveEvent) -> bool {
        if !self.infer_live_regions {
            debug!("live region support is off, dropping event");
            return false;
        }

        let politeness = self.resolver.live_type(&event.source);
        match politeness {
            // Regions without an effective politeness are never announced.
            PolitenessLevel::Off | PolitenessLevel::None => {
                debug!(level = politeness.as_str(), "dropping event");
                return false;
            }
            PolitenessLevel::Polite => {}
            PolitenessLevel::Assertive => self.queue.purge_by_priority(PolitenessLevel::Polite),
            // The inclusive purge means this also evicts queued polite entries.
            PolitenessLevel::Rude => self.queue.purge_by_priority(PolitenessLevel::Assertive),
        }

        let Some(message) = self.extract_message(event).await else {
            return false;
        };

        let was_empty = self.queue.is_empty();
        self.queue.enqueue(message, politeness, event.source.clone());
        debug!(level = politeness.as_str(), queued = self.queue.len(), "enqueued announcement");
        was_empty
    }

    /// Drain callback: purge stale entries, then speak at most one
    /// announcement if the speech engine is idle.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn pump_messages(&mut self) -> PumpOutcome {
        self.queue.purge_by_keep_alive(self.config.keep_alive);

        if !self.queue.is_empty() && !self.speech.is_speaking().await {
            if let Some(entry) = self.queue.dequeue() {
                let utterances = entry.message.utterances();
                self.speech.speak_utterances(&utterances).await;
                self.last_live = Some(entry.source);
                self.cache.push(utterances);
            }
        }

        if self.queue.is_empty() {
            PumpOutcome::Idle
        } else {
            PumpOutcome::Continue
        }
    }

    /// Extract the announcement for an event, or `None` when there is
    /// nothing worth saying.
    async fn extract_message(&self, event: &LiveEvent) -> Option<Message> {
        let attrs = Attributes::of(event.source.as_ref());

        let content = match &event.kind {
            LiveEventKind::ChildAdded { child } => {
                if attrs.atomic() {
                    event.source.text()
                } else {
                    child.text()
                }
            }
            LiveEventKind::TextInserted { text, offset } => {
                // The real content arrives with the follow-on
                // children-changed event; announcing here would duplicate it.
                if text.starts_with(EMBEDDED_OBJECT_CHAR) {
                    return None;
                }
                debug!(offset, len = text.len(), "text insertion");
                if attrs.atomic() {
                    event.source.text()
                } else {
                    Some(text.clone())
                }
            }
        };

        let content = content.unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return None;
        }
        let content = match content.chars().next() {
            Some(only) if content.chars().count() == 1 => messages::character_name(only),
            _ => content,
        };

        // Proper live regions carry aria labels, exposed as the name.
        // Failing that, the description.
        let mut label = event.source.name().trim().to_string();
        if label.is_empty() {
            label = event.source.description().trim().to_string();
        }
        let labels = if !label.is_empty() && label != content {
            vec![label]
        } else {
            Vec::new()
        };

        let message = Message {
            labels,
            content: vec![content],
        };

        // Notify-channel messages bypass the queue entirely.
        if attrs.channel() == Some("notify") {
            self.speech.interrupt().await;
            self.speech.speak_utterances(&message.utterances()).await;
            return None;
        }

        Some(message)
    }

    /// Cycle the politeness override of the given object one step forward,
    /// announcing the new level (or why it cannot be set).
    pub async fn advance_politeness(&mut self, obj: &AccessibleRef) {
        if !self.infer_live_regions {
            self.speech.present_message(messages::LIVE_REGIONS_OFF).await;
            return;
        }
        match self.resolver.advance(obj) {
            Ok(level) => self.speech.present_message(messages::politeness_set(level)).await,
            Err(_) => {
                self.speech
                    .present_message(messages::LIVE_REGIONS_CANNOT_OVERRIDE)
                    .await
            }
        }
    }

    /// Toggle between forcing every live region on the page to off and
    /// restoring their previous levels. Scans the document subtree for
    /// marked-up regions each time.
    pub async fn monitor_live_regions(&mut self, document_root: &AccessibleRef) {
        if !self.infer_live_regions {
            self.speech.present_message(messages::LIVE_REGIONS_OFF).await;
            return;
        }

        if self.resolver.is_monitoring() {
            self.speech.present_message(messages::LIVE_REGIONS_ALL_OFF).await;
            self.queue.clear();
            let regions = find_live_regions(document_root);
            self.resolver.force_all_off(&regions);
        } else {
            self.resolver.restore();
            self.speech
                .present_message(messages::LIVE_REGIONS_ALL_RESTORED)
                .await;
        }
    }

    /// Speak the contents of the most recently announced live region and
    /// return it so the host can move the caret there.
    pub async fn go_last_live_region(&self) -> Option<AccessibleRef> {
        let obj = self.last_live.clone()?;
        if let Some(text) = obj.text() {
            self.speech.speak_utterances(&[text]).await;
        }
        Some(obj)
    }

    /// Speak the nth most recent cached announcement (1 = newest).
    pub async fn review_live_announcement(&self, n: usize) {
        if !self.infer_live_regions {
            self.speech.present_message(messages::LIVE_REGIONS_OFF).await;
            return;
        }
        match self.cache.review(n) {
            Some(cached) => self.speech.speak_utterances(&cached.utterances).await,
            None => {
                self.speech
                    .present_message(messages::LIVE_REGIONS_NO_MESSAGE)
                    .await
            }
        }
    }

    /// Describe a live region: its DESCRIBED_BY relation text (when it adds
    /// something beyond the object's own description) plus its overridden
    /// politeness, spoken as one message.
    pub async fn output_live_region_description(&self, obj: &AccessibleRef) {
        let description = self.live_region_description(obj);
        if !description.is_empty() {
            self.speech.present_message(&description.join(" ")).await;
        }
    }

    /// The description parts without speaking them.
    pub fn live_region_description(&self, obj: &AccessibleRef) -> Vec<String> {
        let mut results = Vec::new();

        for target in obj.described_by() {
            if let Some(text) = target.text() {
                if text.trim() != obj.description().trim() {
                    results.push(text);
                }
            }
        }

        let level = self
            .resolver
            .override_for(obj)
            .map(|level| level.as_str())
            .unwrap_or("none");
        if !results.is_empty() || level != "none" {
            results.push(messages::politeness_description(level));
        }

        results
    }

    /// Drop every pending announcement.
    pub fn flush_messages(&mut self) {
        self.queue.clear();
    }

    /// Flip the master live-region switch, flushing the queue when support
    /// is turned off.
    pub async fn toggle_live_region_support(&mut self) {
        if self.infer_live_regions {
            self.infer_live_regions = false;
            self.flush_messages();
            self.speech
                .present_message(messages::LIVE_REGIONS_MONITORING_OFF)
                .await;
        } else {
            self.infer_live_regions = true;
            self.speech
                .present_message(messages::LIVE_REGIONS_MONITORING_ON)
                .await;
        }
    }

    /// Whether live region support is currently enabled.
    pub fn live_region_support(&self) -> bool {
        self.infer_live_regions
    }
}
