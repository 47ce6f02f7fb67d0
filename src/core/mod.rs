//! Core scheduling logic.
//!
//! This module contains:
//! - PriorityQueue: pending announcements ordered by (priority, time)
//! - PolitenessResolver: markup, overrides, and the monitor toggle
//! - MessageCache: bounded review cache of spoken announcements
//! - LiveRegionManager: the event-to-speech pipeline
//! - service: the tokio drain-loop driver

pub mod cache;
pub mod manager;
pub mod queue;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use cache::{CachedMessage, MessageCache, DEFAULT_CACHE_SIZE};
pub use manager::{LiveRegionManager, ManagerConfig, PumpOutcome};
pub use queue::{PriorityQueue, QueueEntry};
pub use resolver::{OverrideKey, PolitenessOverrides, PolitenessResolver, ResolverError};
pub use service::{spawn, ServiceError, ServiceHandle, DEFAULT_PUMP_INTERVAL};
