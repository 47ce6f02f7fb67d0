//! The accessible-object seam.
//!
//! The live-region subsystem never owns the objects it announces; it borrows
//! them from whatever accessibility layer hosts it. [`Accessible`] is the
//! narrow view it needs: attributes, name/description, flattened text,
//! tree structure, and `DESCRIBED_BY` relation targets.
//!
//! [`snapshot`] provides an in-memory implementation loaded from JSON, used
//! by the replay CLI and the test suite.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::PolitenessLevel;

pub mod snapshot;

pub use snapshot::{SnapshotError, SnapshotTree};

/// Shared handle to an accessible object.
pub type AccessibleRef = Arc<dyn Accessible>;

/// Minimal view of an accessible object.
pub trait Accessible: Send + Sync {
    /// Accessible name (typically the aria label).
    fn name(&self) -> String;

    /// Accessible description.
    fn description(&self) -> String;

    /// The raw attribute map, as exposed by `getAttributes()`.
    fn raw_attributes(&self) -> HashMap<String, String>;

    /// Flattened text content, if the object exposes a text interface.
    fn text(&self) -> Option<String>;

    /// Child objects, in order.
    fn children(&self) -> Vec<AccessibleRef>;

    /// Parent object, if any.
    fn parent(&self) -> Option<AccessibleRef>;

    /// Index of this object within its parent's children.
    fn index_in_parent(&self) -> Option<usize>;

    /// Targets of the `DESCRIBED_BY` relation.
    fn described_by(&self) -> Vec<AccessibleRef>;
}

/// Typed lookup over the raw attribute map.
///
/// Live-region handling only cares about a handful of keys; each accessor
/// applies its own default so callers never touch the map directly.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    map: HashMap<String, String>,
}

impl Attributes {
    /// Snapshot the attributes of an object.
    pub fn of(obj: &dyn Accessible) -> Self {
        Self {
            map: obj.raw_attributes(),
        }
    }

    /// Politeness derived from `container-live` markup.
    pub fn live(&self) -> PolitenessLevel {
        PolitenessLevel::from_markup(self.map.get("container-live").map(String::as_str))
    }

    /// Whether the object carries `container-live` markup at all.
    pub fn has_live_markup(&self) -> bool {
        self.map.contains_key("container-live")
    }

    /// `container-atomic` flag: announce the whole container on any change.
    pub fn atomic(&self) -> bool {
        self.map.get("container-atomic").map(String::as_str) == Some("true")
    }

    /// Delivery channel, e.g. `notify` for out-of-band announcements.
    pub fn channel(&self) -> Option<&str> {
        self.map.get("channel").map(String::as_str)
    }

    /// The element's markup `id`, if it has one.
    pub fn id(&self) -> Option<&str> {
        self.map.get("id").map(String::as_str)
    }
}

/// Stable identity of an element within a page.
///
/// Elements without an `id` attribute fall back to their index path from
/// the document root, which survives reloads of an unchanged page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKey {
    Id(String),
    Path(Vec<usize>),
}

/// Compute the identity key for an object: markup id when present,
/// otherwise the index path to the root.
pub fn element_key(obj: &AccessibleRef) -> ElementKey {
    if let Some(id) = Attributes::of(obj.as_ref()).id() {
        return ElementKey::Id(id.to_string());
    }
    ElementKey::Path(index_path(obj))
}

/// Whether the object exposes an `id` attribute and can therefore carry a
/// user politeness override addressed by id.
pub fn has_element_id(obj: &AccessibleRef) -> bool {
    Attributes::of(obj.as_ref()).id().is_some()
}

fn index_path(obj: &AccessibleRef) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = obj.clone();
    loop {
        let Some(index) = current.index_in_parent() else {
            break;
        };
        let Some(parent) = current.parent() else {
            break;
        };
        path.push(index);
        current = parent;
    }
    path.reverse();
    path
}

/// Collect every object in the subtree that carries live-region markup.
pub fn find_live_regions(root: &AccessibleRef) -> Vec<AccessibleRef> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(obj) = stack.pop() {
        if Attributes::of(obj.as_ref()).has_live_markup() {
            found.push(obj.clone());
        }
        let mut children = obj.children();
        children.reverse();
        stack.extend(children);
    }
    found
}
