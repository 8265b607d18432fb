//! Track sections
//!
//! A section is a labeled time range within a track (intro, verse, chorus)
//! used for highlighting and seek-to-section navigation. Sections for a
//! track are sorted by `start_ms` and do not overlap.

use serde::{Deserialize, Serialize};

/// Labeled time range within a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSection {
    /// Section id
    pub id: String,

    /// Canonical id of the owning track
    pub track_id: String,

    /// Display label (intro, verse, chorus, ...)
    pub label: String,

    /// Range start in milliseconds (inclusive)
    pub start_ms: u64,

    /// Range end in milliseconds (exclusive, except for the final section)
    pub end_ms: u64,
}

/// Section-related player state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionState {
    /// Explicitly selected section; when set it overrides position-derived
    /// highlighting outright
    pub current_section_id: Option<String>,

    /// Section to loop; playback leaving its range seeks back to its start
    pub loop_section_id: Option<String>,
}

/// Resolve the section to highlight
///
/// An explicit `current_section_id` wins outright. Otherwise the active
/// section is the one whose `[start_ms, end_ms)` range contains the
/// position; for the final section the upper bound is inclusive, so playback
/// resting at the exact end of a track still highlights it. No match means
/// nothing is highlighted.
pub fn active_section<'a>(
    sections: &'a [TrackSection],
    position_ms: u64,
    current_section_id: Option<&str>,
) -> Option<&'a TrackSection> {
    if let Some(id) = current_section_id {
        return sections.iter().find(|s| s.id == id);
    }

    let last = sections.len().checked_sub(1)?;
    sections.iter().enumerate().find_map(|(i, section)| {
        let in_range = position_ms >= section.start_ms
            && (position_ms < section.end_ms || (i == last && position_ms == section.end_ms));
        in_range.then_some(section)
    })
}

/// Seek target for loop enforcement
///
/// When a loop section is set and the position has exited its
/// `[start_ms, end_ms)` range, returns the `start_ms` to seek back to.
/// Unknown loop ids and in-range positions yield `None`.
pub fn loop_target(
    sections: &[TrackSection],
    loop_section_id: &str,
    position_ms: u64,
) -> Option<u64> {
    let section = sections.iter().find(|s| s.id == loop_section_id)?;
    let outside = position_ms < section.start_ms || position_ms >= section.end_ms;
    outside.then_some(section.start_ms)
}
