//! Live-region change events.
//!
//! These are the two AT-SPI event shapes the pipeline reacts to:
//! `object:children-changed:add` and `object:text-changed:insert`. The
//! source object is borrowed from the accessibility layer.

use std::fmt;

use crate::accessible::AccessibleRef;

/// Marker that prefixes inserted text when the real content arrives as an
/// embedded object (a follow-on children-changed event carries it).
pub const EMBEDDED_OBJECT_CHAR: char = '\u{fffc}';

/// A change event on a live region.
#[derive(Clone)]
pub struct LiveEvent {
    /// The live-region container the change occurred in.
    pub source: AccessibleRef,

    /// What changed.
    pub kind: LiveEventKind,
}

/// The shape of the change.
#[derive(Clone)]
pub enum LiveEventKind {
    /// A child object was added to the container.
    ChildAdded { child: AccessibleRef },

    /// Text was inserted into the container. `text` is the inserted
    /// substring itself (the accessibility event payload, not the full
    /// container text), so announcement extraction uses it as-is; `offset`
    /// records where in the container it landed, for logs and replay files.
    TextInserted { text: String, offset: usize },
}

impl LiveEvent {
    /// An `object:children-changed:add` event.
    pub fn child_added(source: AccessibleRef, child: AccessibleRef) -> Self {
        Self {
            source,
            kind: LiveEventKind::ChildAdded { child },
        }
    }

    /// An `object:text-changed:insert` event.
    pub fn text_inserted(source: AccessibleRef, text: impl Into<String>, offset: usize) -> Self {
        Self {
            source,
            kind: LiveEventKind::TextInserted {
                text: text.into(),
                offset,
            },
        }
    }

    /// AT-SPI style event type string, for logging.
    pub fn type_str(&self) -> &'static str {
        match self.kind {
            LiveEventKind::ChildAdded { .. } => "object:children-changed:add",
            LiveEventKind::TextInserted { .. } => "object:text-changed:insert",
        }
    }
}

impl fmt::Debug for LiveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveEvent")
            .field("type", &self.type_str())
            .field("source", &self.source.name())
            .finish()
    }
}
