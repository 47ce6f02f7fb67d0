//! User-facing spoken strings for live-region commands.

use crate::domain::PolitenessLevel;

/// Spoken when a command is used while live region support is disabled.
pub const LIVE_REGIONS_OFF: &str = "Live region support is off";

/// Spoken when all live regions on the page are forced off.
pub const LIVE_REGIONS_ALL_OFF: &str = "All live regions set to off";

/// Spoken when forced-off regions get their previous levels back.
pub const LIVE_REGIONS_ALL_RESTORED: &str = "All live regions restored to their default politeness level";

/// Spoken when live region support is switched on.
pub const LIVE_REGIONS_MONITORING_ON: &str = "Live regions monitoring on";

/// Spoken when live region support is switched off.
pub const LIVE_REGIONS_MONITORING_OFF: &str = "Live regions monitoring off";

/// Spoken when the user reviews a cache slot with nothing in it.
pub const LIVE_REGIONS_NO_MESSAGE: &str = "No live region message saved";

/// Spoken when the focused object cannot carry a politeness override.
pub const LIVE_REGIONS_CANNOT_OVERRIDE: &str =
    "Object does not have an id, cannot override live region priority";

/// Announcement for a newly set politeness level.
pub fn politeness_set(level: PolitenessLevel) -> &'static str {
    match level {
        PolitenessLevel::Off => "Setting live region to off",
        PolitenessLevel::None => "Setting live region to none",
        PolitenessLevel::Polite => "Setting live region to polite",
        PolitenessLevel::Assertive => "Setting live region to assertive",
        PolitenessLevel::Rude => "Setting live region to rude",
    }
}

/// Description suffix naming a region's current politeness.
pub fn politeness_description(level: &str) -> String {
    format!("politeness level {level}")
}

/// Name for single-character content, so a lone punctuation mark or
/// whitespace character is still announced meaningfully.
pub fn character_name(c: char) -> String {
    match c {
        ' ' => "space".to_string(),
        '\u{a0}' => "space".to_string(),
        '\n' => "newline".to_string(),
        '\t' => "tab".to_string(),
        '.' => "dot".to_string(),
        ',' => "comma".to_string(),
        '!' => "exclamation point".to_string(),
        '?' => "question mark".to_string(),
        '-' => "dash".to_string(),
        '*' => "star".to_string(),
        other => other.to_string(),
    }
}
