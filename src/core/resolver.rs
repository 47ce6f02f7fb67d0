//! Politeness resolution: markup, user overrides, and the monitor toggle.
//!
//! The resolver decides how urgently a given region's change should be
//! announced. A per-object user override (keyed by page URI plus element
//! identity) always wins over the region's `container-live` markup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accessible::{element_key, has_element_id, AccessibleRef, Attributes, ElementKey};
use crate::domain::PolitenessLevel;

/// Errors from override operations.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The object exposes no `id` attribute, so it cannot carry an
    /// individually addressed override.
    #[error("Object does not have an id attribute, cannot override live priority")]
    NoElementId,
}

/// Key of one politeness override: which element on which page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideKey {
    pub uri: String,
    pub element: ElementKey,
}

/// The full override map for a session. Persisted across sessions through
/// the bookmarks store.
pub type PolitenessOverrides = HashMap<OverrideKey, PolitenessLevel>;

/// Resolves politeness for accessible objects on one page.
pub struct PolitenessResolver {
    page_uri: String,
    overrides: PolitenessOverrides,

    /// Snapshot taken when the user forces everything off, so the previous
    /// levels can be put back on the next toggle.
    restore: Option<PolitenessOverrides>,

    /// False while the user has forced all live regions off.
    monitoring: bool,
}

impl PolitenessResolver {
    pub fn new(page_uri: impl Into<String>) -> Self {
        Self {
            page_uri: page_uri.into(),
            overrides: PolitenessOverrides::new(),
            restore: None,
            monitoring: true,
        }
    }

    pub fn page_uri(&self) -> &str {
        &self.page_uri
    }

    /// Whether live regions are currently being monitored (not forced off).
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// The current override map, for persistence.
    pub fn overrides(&self) -> &PolitenessOverrides {
        &self.overrides
    }

    /// Replace the override map, typically with one loaded from disk.
    pub fn set_overrides(&mut self, overrides: PolitenessOverrides) {
        self.overrides = overrides;
    }

    fn key_for(&self, obj: &AccessibleRef) -> OverrideKey {
        OverrideKey {
            uri: self.page_uri.clone(),
            element: element_key(obj),
        }
    }

    /// The politeness level for an object: override first, then markup.
    ///
    /// While monitoring, regions that resolve to `None` are registered in
    /// the override map so a later force-all-off can find them and the user
    /// can cycle their level.
    pub fn live_type(&mut self, obj: &AccessibleRef) -> PolitenessLevel {
        let key = self.key_for(obj);
        if let Some(level) = self.overrides.get(&key) {
            return *level;
        }
        let level = Attributes::of(obj.as_ref()).live();
        if level == PolitenessLevel::None && self.monitoring {
            self.overrides.insert(key, level);
        }
        level
    }

    /// The override for an object, without registering anything.
    pub fn override_for(&self, obj: &AccessibleRef) -> Option<PolitenessLevel> {
        self.overrides.get(&self.key_for(obj)).copied()
    }

    /// Cycle the object's override one step forward and return the new
    /// level. Only objects with an `id` attribute can be overridden.
    pub fn advance(&mut self, obj: &AccessibleRef) -> Result<PolitenessLevel, ResolverError> {
        if !has_element_id(obj) {
            return Err(ResolverError::NoElementId);
        }
        let key = self.key_for(obj);
        let current = self
            .overrides
            .get(&key)
            .copied()
            .unwrap_or_else(|| Attributes::of(obj.as_ref()).live());
        let next = current.advanced();
        self.overrides.insert(key, next);
        Ok(next)
    }

    /// Force every known live region on the page to `Off`, snapshotting the
    /// previous levels for [`restore`](Self::restore). `regions` is the set
    /// of marked-up live regions found in the document, which may include
    /// objects not yet in the override map.
    pub fn force_all_off(&mut self, regions: &[AccessibleRef]) {
        self.restore = Some(self.overrides.clone());

        for level in self.overrides.values_mut() {
            *level = PolitenessLevel::Off;
        }
        for region in regions {
            let key = self.key_for(region);
            self.overrides.insert(key, PolitenessLevel::Off);
        }

        self.monitoring = false;
    }

    /// Put back the levels snapshotted by the last force-all-off. Regions
    /// that only entered the map through the force-off scan drop back to
    /// their markup-derived level.
    pub fn restore(&mut self) {
        if let Some(saved) = self.restore.take() {
            self.overrides = saved;
        }
        self.monitoring = true;
    }

    /// Drop `None` registrations that belong to other pages. Real overrides
    /// (any level other than `None`) are kept regardless of page.
    pub fn reset(&mut self) {
        let current = self.page_uri.clone();
        self.overrides
            .retain(|key, level| key.uri == current || *level != PolitenessLevel::None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessible::SnapshotTree;

    fn tree() -> SnapshotTree {
        SnapshotTree::from_json(
            r#"{
                "name": "document",
                "children": [
                    {"attributes": {"id": "status", "container-live": "polite"}, "text": "ok"},
                    {"attributes": {"id": "plain"}, "text": "no markup"},
                    {"text": "anonymous"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_markup_resolution() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/page");
        let status = tree.require("status").unwrap();
        assert_eq!(resolver.live_type(&status), PolitenessLevel::Polite);
    }

    #[test]
    fn test_override_wins_over_markup() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/page");
        let status = tree.require("status").unwrap();

        resolver.advance(&status).unwrap();
        assert_eq!(resolver.live_type(&status), PolitenessLevel::Assertive);
    }

    #[test]
    fn test_none_registered_while_monitoring() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/page");
        let plain = tree.require("plain").unwrap();

        assert_eq!(resolver.live_type(&plain), PolitenessLevel::None);
        assert_eq!(resolver.override_for(&plain), Some(PolitenessLevel::None));
    }

    #[test]
    fn test_advance_requires_id() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/page");
        let anonymous = tree.root().children()[2].clone();

        assert!(matches!(
            resolver.advance(&anonymous),
            Err(ResolverError::NoElementId)
        ));
    }

    #[test]
    fn test_force_off_and_restore() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/page");
        let status = tree.require("status").unwrap();

        resolver.advance(&status).unwrap(); // Polite -> Assertive
        resolver.force_all_off(&[status.clone()]);
        assert!(!resolver.is_monitoring());
        assert_eq!(resolver.live_type(&status), PolitenessLevel::Off);

        resolver.restore();
        assert!(resolver.is_monitoring());
        assert_eq!(resolver.live_type(&status), PolitenessLevel::Assertive);
    }

    #[test]
    fn test_reset_drops_foreign_none_entries() {
        let tree = tree();
        let mut resolver = PolitenessResolver::new("http://example.com/other");
        let plain = tree.require("plain").unwrap();
        resolver.live_type(&plain); // registers None under /other

        let mut moved = PolitenessResolver::new("http://example.com/page");
        moved.set_overrides(resolver.overrides().clone());
        moved.reset();
        assert!(moved.overrides().is_empty());
    }
}
