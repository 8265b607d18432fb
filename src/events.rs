//! Player events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as it mutates state; the host drains them after each batch of
//! intents or update polling and re-renders whatever changed.

use crate::types::{ControllerState, Provider};
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport lifecycle changed (opening, playing, paused, closed)
    StateChanged {
        /// The new state
        state: ControllerState,
    },

    /// Current track changed
    TrackChanged {
        /// Canonical id of the new track, if any
        canonical_track_id: Option<String>,
        /// Canonical id of the previous track, if any
        previous_track_id: Option<String>,
    },

    /// Active provider changed
    ProviderChanged {
        /// The newly active provider, or `None` after stop/close
        provider: Option<Provider>,
    },

    /// Playback position moved (merged update or optimistic seek)
    PositionChanged {
        /// Position in milliseconds
        position_ms: u64,
        /// Duration in milliseconds (0 = unknown)
        duration_ms: u64,
    },

    /// Volume or mute state changed
    VolumeChanged {
        /// Volume in `[0.0, 1.0]`
        volume: f32,
        /// Mute state
        is_muted: bool,
    },

    /// Queue contents or position changed
    QueueChanged {
        /// New queue length
        length: usize,
        /// Index of the current entry, if any
        current_index: Option<usize>,
    },

    /// Explicit section selection changed
    SectionChanged {
        /// Selected section id, or `None` for position-derived highlighting
        section_id: Option<String>,
    },
}
