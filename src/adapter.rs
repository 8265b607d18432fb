//! Provider adapter boundary
//!
//! Hides the differences between embeddable playback SDKs behind one
//! contract. Each adapter wraps a single provider's embed; the controller
//! decides which adapter is active and is the only caller of the control
//! surface. Adapters report back asynchronously through an [`UpdateSink`]
//! handed to them on activation.

use crate::types::Provider;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Activation request for a provider adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ActivateRequest {
    /// Track id in the provider's namespace
    pub provider_track_id: String,

    /// Start playback once the embed is ready
    pub autoplay: bool,

    /// Initial seek position in seconds
    pub start_sec: Option<f64>,
}

/// Partial state patch reported by a provider embed
///
/// Every field is optional; adapters send whatever the underlying SDK
/// reported. The controller treats these patches as the sole source of
/// truth for what the provider is actually doing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPlaybackUpdate {
    /// Playback position in milliseconds
    pub position_ms: Option<u64>,

    /// Track duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Whether the embed is playing
    pub is_playing: Option<bool>,

    /// Embed volume in `[0.0, 1.0]`
    pub volume: Option<f32>,

    /// Embed mute state
    pub is_muted: Option<bool>,

    /// Track id the embed is actually playing
    pub track_id: Option<String>,

    /// Title reported by the provider
    pub title: Option<String>,

    /// Artist reported by the provider
    pub artist: Option<String>,
}

impl ProviderPlaybackUpdate {
    /// Patch carrying only a position sample
    pub fn position(position_ms: u64) -> Self {
        Self {
            position_ms: Some(position_ms),
            ..Self::default()
        }
    }

    /// Patch carrying only a play-state flip
    pub fn playing(is_playing: bool) -> Self {
        Self {
            is_playing: Some(is_playing),
            ..Self::default()
        }
    }
}

/// An update tagged with its origin
///
/// The generation identifies which activation produced the update. The
/// controller bumps its generation on every switch, so patches from a
/// superseded activation (including one torn down mid-handshake) are
/// recognizably stale and dropped instead of mutating transport state.
#[derive(Debug, Clone)]
pub struct TaggedUpdate {
    /// Provider that produced the update
    pub provider: Provider,

    /// Activation generation the sink was created for
    pub generation: u64,

    /// The patch itself
    pub update: ProviderPlaybackUpdate,
}

/// Handle an adapter uses to push playback updates to the controller
///
/// Created by the controller per activation and passed to
/// [`ProviderAdapter::activate`]. Cheap to clone; an adapter typically
/// stores one clone in its embed event listener. Emitting after the
/// controller has moved on is harmless: the stale generation is discarded.
#[derive(Debug, Clone)]
pub struct UpdateSink {
    provider: Provider,
    generation: u64,
    tx: Sender<TaggedUpdate>,
}

impl UpdateSink {
    pub(crate) fn new(provider: Provider, generation: u64, tx: Sender<TaggedUpdate>) -> Self {
        Self {
            provider,
            generation,
            tx,
        }
    }

    /// Push a playback update to the controller
    ///
    /// Never fails from the adapter's perspective; a disconnected controller
    /// simply ignores the patch.
    pub fn emit(&self, update: ProviderPlaybackUpdate) {
        let _ = self.tx.send(TaggedUpdate {
            provider: self.provider,
            generation: self.generation,
            update,
        });
    }

    /// Provider this sink was created for
    pub fn provider(&self) -> Provider {
        self.provider
    }
}

/// Uniform control surface over one provider's embeddable player
///
/// Contract, independent of the underlying SDK:
///
/// - `activate` is idempotent: re-activating with an identical request while
///   already active must not reload the embed or trigger a second autoplay.
/// - `deactivate` stops playback and releases embed resources; it must be
///   safe to call on a never-activated or mid-activation adapter, and after
///   it returns no effect of the in-flight activation (autoplay, initial
///   seek) may still land.
/// - Every control method must be safe to invoke before activation has
///   finished: queue or ignore, never panic.
/// - Failures (embed script failed to load, SDK error) surface as an absence
///   of updates on the sink, not as panics or error returns. A stuck adapter
///   is superseded by the next activation.
pub trait ProviderAdapter: Send {
    /// Provider this adapter wraps
    fn provider(&self) -> Provider;

    /// Load or prime the embed for a target and start reporting updates
    fn activate(&mut self, request: ActivateRequest, sink: UpdateSink);

    /// Stop playback and release embed resources
    fn deactivate(&mut self);

    /// Start or resume playback, optionally from a position in seconds
    fn play(&mut self, start_sec: Option<f64>);

    /// Pause playback
    fn pause(&mut self);

    /// Seek to a position in seconds
    fn seek_to(&mut self, seconds: f64);

    /// Set embed volume in `[0.0, 1.0]`
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute the embed
    fn set_mute(&mut self, muted: bool);
}
