//! The speech-subsystem seam.
//!
//! The scheduler only needs three things from a speech engine: a busy poll,
//! fire-and-forget utterance delivery, and an interrupt for out-of-band
//! notify messages. [`ConsoleSpeech`] backs the replay CLI;
//! [`RecordingSpeech`] captures output for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// Speech engine interface.
#[async_trait]
pub trait Speech: Send + Sync {
    /// Whether the engine is currently speaking. The pump skips its speak
    /// step while this is true.
    async fn is_speaking(&self) -> bool;

    /// Queue a set of utterances for speaking. Fire-and-forget.
    async fn speak_utterances(&self, utterances: &[String]);

    /// Present a single status message to the user.
    async fn present_message(&self, message: &str);

    /// Cut off whatever is currently being spoken.
    async fn interrupt(&self);
}

/// Prints announcements to stdout. Used by the replay CLI.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

#[async_trait]
impl Speech for ConsoleSpeech {
    async fn is_speaking(&self) -> bool {
        false
    }

    async fn speak_utterances(&self, utterances: &[String]) {
        tracing::debug!(count = utterances.len(), "speaking utterances");
        println!("{}", utterances.join(" "));
    }

    async fn present_message(&self, message: &str) {
        println!("{message}");
    }

    async fn interrupt(&self) {
        tracing::debug!("speech interrupted");
    }
}

/// Captures everything it is asked to speak. The `speaking` flag is
/// controllable so tests can simulate a busy engine.
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<Vec<String>>>,
    messages: Mutex<Vec<String>>,
    speaking: AtomicBool,
    interrupts: AtomicUsize,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the engine being busy (or idle again).
    pub fn set_speaking(&self, speaking: bool) {
        self.speaking.store(speaking, Ordering::SeqCst);
    }

    /// All utterance sets spoken so far, in order.
    pub fn spoken(&self) -> Vec<Vec<String>> {
        self.spoken.lock().expect("spoken lock").clone()
    }

    /// All status messages presented so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }

    pub fn interrupt_count(&self) -> usize {
        self.interrupts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Speech for RecordingSpeech {
    async fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    async fn speak_utterances(&self, utterances: &[String]) {
        self.spoken.lock().expect("spoken lock").push(utterances.to_vec());
    }

    async fn present_message(&self, message: &str) {
        self.messages.lock().expect("messages lock").push(message.to_string());
    }

    async fn interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
    }
}
