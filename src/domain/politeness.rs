//! Politeness levels for live regions.
//!
//! The level controls whether and how eagerly a live-region change is
//! announced. Levels are ordered so that queue purging can compare them
//! directly: `Off < None < Polite < Assertive < Rude`.

use serde::{Deserialize, Serialize};

/// Urgency classification of a live region.
///
/// `None` and `Off` both suppress announcements but mean different things:
/// `None` is the default for a region with no `container-live` markup and no
/// user override, while `Off` records that the region was explicitly
/// silenced (by markup or by the user). Both act as the bottom of the
/// override cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolitenessLevel {
    /// Explicitly silenced
    Off,

    /// No markup, no override
    None,

    /// Announce when nothing else is pending
    Polite,

    /// Announce soon, evicting queued polite messages
    Assertive,

    /// Announce as soon as possible, evicting queued assertive messages
    Rude,
}

impl PolitenessLevel {
    /// Parse the value of a `container-live` markup attribute.
    ///
    /// Unknown values and absence both map to `None`.
    pub fn from_markup(value: Option<&str>) -> Self {
        match value {
            Some("off") => Self::Off,
            Some("polite") => Self::Polite,
            Some("assertive") => Self::Assertive,
            Some("rude") => Self::Rude,
            _ => Self::None,
        }
    }

    /// The level as a user-facing string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::None => "none",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
            Self::Rude => "rude",
        }
    }

    /// The next level in the user override cycle:
    /// `None`/`Off` → `Polite` → `Assertive` → `Rude` → `Off`.
    pub fn advanced(&self) -> Self {
        match self {
            Self::Off | Self::None => Self::Polite,
            Self::Polite => Self::Assertive,
            Self::Assertive => Self::Rude,
            Self::Rude => Self::Off,
        }
    }

    /// Whether events at this level should be queued at all.
    pub fn is_announceable(&self) -> bool {
        matches!(self, Self::Polite | Self::Assertive | Self::Rude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        use PolitenessLevel::*;
        assert!(Off < None);
        assert!(None < Polite);
        assert!(Polite < Assertive);
        assert!(Assertive < Rude);
    }

    #[test]
    fn test_from_markup() {
        assert_eq!(PolitenessLevel::from_markup(Some("off")), PolitenessLevel::Off);
        assert_eq!(PolitenessLevel::from_markup(Some("polite")), PolitenessLevel::Polite);
        assert_eq!(
            PolitenessLevel::from_markup(Some("assertive")),
            PolitenessLevel::Assertive
        );
        assert_eq!(PolitenessLevel::from_markup(Some("rude")), PolitenessLevel::Rude);
        assert_eq!(PolitenessLevel::from_markup(Some("bogus")), PolitenessLevel::None);
        assert_eq!(PolitenessLevel::from_markup(None), PolitenessLevel::None);
    }

    #[test]
    fn test_advance_cycle() {
        let mut level = PolitenessLevel::None;
        let expected = [
            PolitenessLevel::Polite,
            PolitenessLevel::Assertive,
            PolitenessLevel::Rude,
            PolitenessLevel::Off,
            PolitenessLevel::Polite,
        ];
        for want in expected {
            level = level.advanced();
            assert_eq!(level, want);
        }
    }
}
