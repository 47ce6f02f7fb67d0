//! Tokio driver for a live-region manager.
//!
//! Owns the manager in a single task: events arrive on an mpsc channel and
//! the pump ticks on an interval, but only while the manager is draining.
//! All state lives in one task, so no locking is needed, matching the
//! single-threaded model of the original event loop.

use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::LiveEvent;

use super::manager::{LiveRegionManager, PumpOutcome};

/// Default pump tick interval.
pub const DEFAULT_PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// Errors interacting with a running service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Live region service is no longer running")]
    Stopped,
}

/// Handle to a spawned live-region service.
pub struct ServiceHandle {
    event_tx: mpsc::Sender<LiveEvent>,
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<LiveRegionManager>,
}

impl ServiceHandle {
    /// Deliver one event to the manager.
    pub async fn send(&self, event: LiveEvent) -> Result<(), ServiceError> {
        self.event_tx.send(event).await.map_err(|_| ServiceError::Stopped)
    }

    /// Stop the service and get the manager back, e.g. to persist its
    /// overrides.
    pub async fn stop(self) -> Result<LiveRegionManager> {
        let _ = self.stop_tx.send(()).await;
        Ok(self.task.await?)
    }
}

/// Spawn a drain-loop task around a manager.
pub fn spawn(manager: LiveRegionManager, pump_interval: Duration) -> ServiceHandle {
    let (event_tx, event_rx) = mpsc::channel::<LiveEvent>(100);
    let (stop_tx, stop_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(run(manager, event_rx, stop_rx, pump_interval));

    ServiceHandle {
        event_tx,
        stop_tx,
        task,
    }
}

async fn run(
    mut manager: LiveRegionManager,
    mut event_rx: mpsc::Receiver<LiveEvent>,
    mut stop_rx: mpsc::Receiver<()>,
    pump_interval: Duration,
) -> LiveRegionManager {
    info!(session = %manager.session_id(), page = manager.page_uri(), "live region service started");

    let mut ticker = tokio::time::interval(pump_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // Idle vs Draining: ticks only fire while draining.
    let mut draining = false;

    loop {
        tokio::select! {
            _ = stop_rx.recv() => {
                info!("live region service stopping");
                break;
            }
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => {
                        if manager.handle_event(&event).await {
                            debug!("queue went non-empty, draining");
                            ticker.reset();
                            draining = true;
                        }
                    }
                    None => {
                        info!("event channel closed, stopping");
                        break;
                    }
                }
            }
            _ = ticker.tick(), if draining => {
                if manager.pump_messages().await == PumpOutcome::Idle {
                    debug!("queue drained, idle");
                    draining = false;
                }
            }
        }
    }

    manager
}
