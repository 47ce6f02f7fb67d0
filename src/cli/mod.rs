//! Command-line interface for arialive.
//!
//! Provides commands for replaying captured live-region event logs against
//! an accessible-tree snapshot, describing a region, and inspecting the
//! resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::fs;

use crate::accessible::SnapshotTree;
use crate::bookmarks::OverrideStore;
use crate::config;
use crate::core::{LiveRegionManager, PumpOutcome};
use crate::domain::LiveEvent;
use crate::speech::ConsoleSpeech;

/// arialive - live-region announcement scheduler
#[derive(Parser, Debug)]
#[command(name = "arialive")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSONL event log against a snapshot tree and print what
    /// would be spoken
    Replay {
        /// Accessible-tree snapshot (JSON)
        snapshot: PathBuf,

        /// Event log (one JSON event per line)
        events: PathBuf,

        /// Page URI used as the override key (defaults to the snapshot path)
        #[arg(long)]
        page_uri: Option<String>,

        /// Load overrides before the replay and save them after
        #[arg(long)]
        persist: bool,
    },

    /// Describe a live region: relation text and politeness level
    Describe {
        /// Accessible-tree snapshot (JSON)
        snapshot: PathBuf,

        /// The `id` attribute of the region to describe
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// One line of a replay event log.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    /// Event type: `children-changed:add` or `text-changed:insert`
    /// (an `object:` prefix is accepted)
    event: String,

    /// `id` attribute of the source node
    source: String,

    /// Added child's `id`, for children-changed events
    #[serde(default)]
    child: Option<String>,

    /// Inserted text, for text-changed events
    #[serde(default)]
    text: Option<String>,

    /// Insertion offset, for text-changed events
    #[serde(default)]
    offset: Option<usize>,
}

impl ReplayRecord {
    fn resolve(&self, tree: &SnapshotTree) -> Result<LiveEvent> {
        let source = tree
            .require(&self.source)
            .with_context(|| format!("Unknown source node: {}", self.source))?;

        let event_type = self.event.strip_prefix("object:").unwrap_or(&self.event);
        match event_type {
            "children-changed:add" => {
                let child_id = self
                    .child
                    .as_deref()
                    .context("children-changed:add event needs a 'child' field")?;
                let child = tree
                    .require(child_id)
                    .with_context(|| format!("Unknown child node: {child_id}"))?;
                Ok(LiveEvent::child_added(source, child))
            }
            "text-changed:insert" => {
                let text = self
                    .text
                    .clone()
                    .context("text-changed:insert event needs a 'text' field")?;
                Ok(LiveEvent::text_inserted(source, text, self.offset.unwrap_or(0)))
            }
            other => anyhow::bail!("Unsupported event type: {other}"),
        }
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Replay {
                snapshot,
                events,
                page_uri,
                persist,
            } => replay(snapshot, events, page_uri, persist).await,
            Commands::Describe { snapshot, id } => describe(snapshot, id).await,
            Commands::Config => show_config(),
        }
    }
}

async fn load_tree(path: &PathBuf) -> Result<SnapshotTree> {
    let json = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    SnapshotTree::from_json(&json).with_context(|| format!("Invalid snapshot: {}", path.display()))
}

async fn replay(
    snapshot: PathBuf,
    events: PathBuf,
    page_uri: Option<String>,
    persist: bool,
) -> Result<()> {
    let tree = load_tree(&snapshot).await?;
    let uri = page_uri.unwrap_or_else(|| format!("replay://{}", snapshot.display()));

    let settings = config::settings()?;
    let mut manager =
        LiveRegionManager::new(uri.clone(), Arc::new(ConsoleSpeech), settings.manager_config());

    if persist {
        let store = OverrideStore::open_default()?;
        let overrides = store.load(&uri).await?;
        tracing::info!(count = overrides.len(), "loaded politeness overrides");
        manager.set_overrides(overrides);
    }

    let log = fs::read_to_string(&events)
        .await
        .with_context(|| format!("Failed to read event log: {}", events.display()))?;

    let mut handled = 0usize;
    for (lineno, line) in log.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", lineno + 1))?;
        let event = record.resolve(&tree)?;
        manager.handle_event(&event).await;
        handled += 1;
    }

    // Drain: one announcement per tick until the queue reports idle.
    while manager.pump_messages().await == PumpOutcome::Continue {}

    tracing::info!(events = handled, "replay finished");

    if persist {
        let store = OverrideStore::open_default()?;
        store.save(&uri, manager.overrides()).await?;
        tracing::info!(path = %store.store_path(&uri).display(), "saved politeness overrides");
    }

    Ok(())
}

async fn describe(snapshot: PathBuf, id: String) -> Result<()> {
    let tree = load_tree(&snapshot).await?;
    let obj = tree
        .require(&id)
        .with_context(|| format!("Unknown node id: {id}"))?;

    let manager = LiveRegionManager::new(
        format!("replay://{}", snapshot.display()),
        Arc::new(ConsoleSpeech),
        config::settings()?.manager_config(),
    );

    let description = manager.live_region_description(&obj);
    if description.is_empty() {
        println!("{id}: not a live region");
    } else {
        println!("{id}: {}", description.join(", "));
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let resolved = config::get()?;

    println!("home: {}", resolved.home.display());
    match &resolved.config_file {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: (none found)"),
    }
    println!("keep alive: {}s", resolved.settings.keep_alive_secs);
    println!("cache size: {}", resolved.settings.cache_size);
    println!("pump interval: {}ms", resolved.settings.pump_interval_ms);
    println!(
        "live region support: {}",
        resolved.settings.infer_live_regions
    );

    Ok(())
}
