//! arialive - live-region announcement scheduler
//!
//! Converts accessibility change events on ARIA-style live regions into
//! prioritized, time-bounded speech announcements.
//!
//! # Architecture
//!
//! Events flow through a single pipeline per page session:
//! - A politeness resolver classifies each event (markup or user override)
//! - A priority queue holds pending announcements in (priority, time) order
//! - A drain pump speaks one announcement per tick while the engine is idle
//! - A bounded cache keeps the last few spoken messages for review
//!
//! The accessibility layer, the speech engine, and override persistence are
//! seams: [`accessible::Accessible`], [`speech::Speech`], and
//! [`bookmarks::OverrideStore`].
//!
//! # Modules
//!
//! - `accessible`: Object-graph seam and the JSON snapshot tree
//! - `bookmarks`: Per-page persistence of politeness overrides
//! - `core`: Scheduling logic (queue, resolver, cache, manager, service)
//! - `domain`: Data structures (PolitenessLevel, LiveEvent, Message)
//! - `speech`: Speech-engine seam
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Replay a captured event log against a page snapshot
//! arialive replay page.json events.jsonl
//!
//! # Describe a live region
//! arialive describe page.json ticker
//! ```

pub mod accessible;
pub mod bookmarks;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod messages;
pub mod speech;

// Re-export main types at crate root for convenience
pub use accessible::{Accessible, AccessibleRef, Attributes, ElementKey, SnapshotTree};
pub use bookmarks::OverrideStore;
pub use core::{LiveRegionManager, ManagerConfig, MessageCache, PriorityQueue, PumpOutcome};
pub use domain::{LiveEvent, LiveEventKind, Message, PolitenessLevel};
pub use speech::{ConsoleSpeech, RecordingSpeech, Speech};
