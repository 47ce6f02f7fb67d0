//! Domain types for the live-region scheduler.
//!
//! This module contains the core data structures:
//! - Politeness: the urgency classification and its override cycle
//! - Events: the change events the pipeline consumes
//! - Messages: the extracted label/content announcements

pub mod event;
pub mod message;
pub mod politeness;

// Re-export commonly used types
pub use event::{LiveEvent, LiveEventKind, EMBEDDED_OBJECT_CHAR};
pub use message::Message;
pub use politeness::PolitenessLevel;
