//! Core types for cross-provider playback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// External playback provider integrated via an embeddable player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Spotify embed
    Spotify,
    /// YouTube embed
    YouTube,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Spotify => write!(f, "spotify"),
            Provider::YouTube => write!(f, "youtube"),
        }
    }
}

/// Separator used in synthetic provider-scoped track ids
const SYNTHETIC_ID_SEPARATOR: char = ':';

/// Build a synthetic canonical id for a track known only to a provider
///
/// Form: `"<provider>:<provider_track_id>"`. Synthetic ids identify a track
/// across the player but are never valid catalog keys (no section or
/// harmony lookups).
pub fn synthetic_track_id(provider: Provider, provider_track_id: &str) -> String {
    format!("{provider}{SYNTHETIC_ID_SEPARATOR}{provider_track_id}")
}

/// Check whether a canonical id is a synthetic provider-scoped id
pub fn is_synthetic_track_id(id: &str) -> bool {
    id.strip_prefix("spotify:").is_some() || id.strip_prefix("youtube:").is_some()
}

/// The unit of target equality for provider switching
///
/// Two playback requests resolve to the same surface exactly when their
/// targets compare equal. `src` carries the embed source URL when known so
/// that a changed embed variant also counts as a new target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTarget {
    /// Which provider's embed hosts the playback
    pub provider: Provider,

    /// Track id in the provider's namespace
    pub track_id: String,

    /// Embed source URL, when the caller resolved one
    pub src: Option<String>,
}

impl PlayTarget {
    /// Create a target without an embed source
    pub fn new(provider: Provider, track_id: impl Into<String>) -> Self {
        Self {
            provider,
            track_id: track_id.into(),
            src: None,
        }
    }
}

/// A request to begin playback
///
/// `provider` and `provider_track_id` may both be `None` when no playback
/// target is known yet (the player shell opens without activating anything).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenIntent {
    /// Canonical track id (catalog id, or synthetic via [`synthetic_track_id`])
    pub canonical_track_id: String,

    /// Target provider, if a playback target is known
    pub provider: Option<Provider>,

    /// Track id in the provider's namespace
    pub provider_track_id: Option<String>,

    /// Track title for display
    pub title: Option<String>,

    /// Artist for display
    pub artist: Option<String>,

    /// Album for display
    pub album: Option<String>,

    /// Start playback immediately once the embed is ready
    pub autoplay: bool,

    /// Opaque context tag (playlist id, feed slot) for analytics
    pub context: Option<String>,

    /// Initial seek position in seconds, clamped to `>= 0`
    pub start_sec: Option<f64>,
}

impl OpenIntent {
    /// Intent for a fully resolved target with autoplay
    pub fn for_target(
        canonical_track_id: impl Into<String>,
        provider: Provider,
        provider_track_id: impl Into<String>,
    ) -> Self {
        Self {
            canonical_track_id: canonical_track_id.into(),
            provider: Some(provider),
            provider_track_id: Some(provider_track_id.into()),
            title: None,
            artist: None,
            album: None,
            autoplay: true,
            context: None,
            start_sec: None,
        }
    }

    /// Resolve the playback target, if both provider halves are present
    pub fn target(&self) -> Option<PlayTarget> {
        match (self.provider, self.provider_track_id.as_ref()) {
            (Some(provider), Some(track_id)) => Some(PlayTarget::new(provider, track_id.clone())),
            _ => None,
        }
    }
}

/// Track entry in the play queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueTrack {
    /// Canonical track id
    pub id: String,

    /// Playback provider for this entry
    pub provider: Provider,

    /// Track id in the provider's namespace
    pub provider_track_id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Track duration in milliseconds, when known
    pub duration_ms: Option<u64>,
}

impl QueueTrack {
    /// Build an open intent that plays this queue entry
    pub fn to_intent(&self) -> OpenIntent {
        OpenIntent {
            canonical_track_id: self.id.clone(),
            provider: Some(self.provider),
            provider_track_id: Some(self.provider_track_id.clone()),
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            album: self.album.clone(),
            autoplay: true,
            context: None,
            start_sec: None,
        }
    }
}

/// Transport state, owned exclusively by the controller
///
/// Consumers read this via [`crate::PlayerController::transport`] and never
/// mutate it directly. Position and duration reflect the last merged
/// provider update, with `position_ms` clamped to `duration_ms` when the
/// duration is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    /// Active provider, if any
    pub provider: Option<Provider>,

    /// Track id in the active provider's namespace
    pub provider_track_id: Option<String>,

    /// Canonical id of the current track
    pub canonical_track_id: Option<String>,

    /// Display title, from the intent or provider metadata
    pub title: Option<String>,

    /// Display artist
    pub artist: Option<String>,

    /// Display album
    pub album: Option<String>,

    /// Whether the active provider reports playback in progress
    pub is_playing: bool,

    /// Playback position in milliseconds
    pub position_ms: u64,

    /// Track duration in milliseconds (0 = unknown)
    pub duration_ms: u64,

    /// Volume in `[0.0, 1.0]`
    pub volume: f32,

    /// Mute state (volume level preserved)
    pub is_muted: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            provider: None,
            provider_track_id: None,
            canonical_track_id: None,
            title: None,
            artist: None,
            album: None,
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            volume: 1.0,
            is_muted: false,
        }
    }
}

/// Controller transport lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    /// No provider or track set
    Closed,

    /// A target has been requested; its adapter is activating
    Opening,

    /// Active adapter reports playback in progress
    Playing,

    /// Active adapter is loaded but not playing
    Paused,
}

/// Configuration for the player controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Debounce window for provider switches (default: 200ms)
    ///
    /// Rapid repeated switch requests within this window collapse into a
    /// single activation carrying the latest payload. Zero disables
    /// debouncing; switches then apply synchronously.
    pub switch_debounce: Duration,

    /// `previous` restarts the current track instead of navigating once
    /// playback is past this position (default: 3s)
    pub restart_threshold: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            switch_debounce: Duration::from_millis(200),
            restart_threshold: Duration::from_secs(3),
        }
    }
}
