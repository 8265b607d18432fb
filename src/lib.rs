//! Chordial Player - Cross-Provider Playback Orchestration
//!
//! Core playback management for Chordial. Exactly one playback surface is
//! active at any time, across heterogeneous provider embeds (Spotify,
//! YouTube) with different readiness, seek, and volume semantics.
//!
//! This crate provides:
//! - The [`PlayerController`] orchestrator: transport, queue, and section
//!   state with a single active-adapter guarantee
//! - The [`ProviderAdapter`] contract hiding per-SDK embed differences
//! - Debounced provider switching so bursts of switch requests cause one
//!   activation ([`DebouncedScheduler`], [`same_target`])
//! - A play queue with next/previous/shuffle/reorder semantics
//! - Track sections (intro/verse/chorus) with position-derived highlighting
//!   and loop enforcement
//! - Persisted local state accessors (guest identity, banner cooldown)
//!
//! # Architecture
//!
//! The crate is completely host-agnostic: no UI framework, no embed SDK,
//! no storage backend. Everything provider-specific arrives through the
//! [`ProviderAdapter`] trait; everything persistent goes through
//! [`prefs::KeyValueStore`]. The model is single-threaded and event-driven:
//! the host serializes UI intents and provider updates onto one loop and
//! calls [`PlayerController::tick`] from it.
//!
//! # Example: Basic Control Flow
//!
//! ```rust
//! use chordial_player::{OpenIntent, PlayerConfig, PlayerController, Provider};
//! use std::time::Duration;
//!
//! let mut controller = PlayerController::new(PlayerConfig {
//!     switch_debounce: Duration::ZERO,
//!     ..PlayerConfig::default()
//! });
//!
//! // Adapters are registered by the host, one per provider:
//! // controller.register_adapter(Box::new(SpotifyEmbedAdapter::new()));
//!
//! controller.open(OpenIntent::for_target("track-1", Provider::Spotify, "sp-1"));
//! controller.seek_to_secs(45.5);
//! controller.set_volume(0.8);
//!
//! // Host event loop: settle switches, merge provider updates, re-render
//! controller.tick();
//! for event in controller.drain_events() {
//!     // update UI
//!     let _ = event;
//! }
//! ```
//!
//! # Example: Queue Navigation
//!
//! ```rust
//! use chordial_player::{PlayerController, Provider, QueueTrack};
//!
//! let mut controller = PlayerController::default();
//!
//! controller.enqueue_later(QueueTrack {
//!     id: "track-1".to_string(),
//!     provider: Provider::YouTube,
//!     provider_track_id: "yt-1".to_string(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     album: None,
//!     duration_ms: Some(180_000),
//! });
//!
//! controller.next_track().ok();
//! controller.shuffle_queue();
//! ```

mod controller;
mod error;
mod events;
pub mod adapter;
pub mod prefs;
pub mod scheduler;
pub mod section;
mod queue;
pub mod types;

// Public exports
pub use adapter::{ActivateRequest, ProviderAdapter, ProviderPlaybackUpdate, TaggedUpdate, UpdateSink};
pub use controller::PlayerController;
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use queue::PlayQueue;
pub use scheduler::{same_target, Clock, DebouncedScheduler, ManualClock, SystemClock};
pub use section::{active_section, SectionState, TrackSection};
pub use types::{
    synthetic_track_id, ControllerState, OpenIntent, PlayTarget, PlayerConfig, Provider,
    QueueTrack, TransportState,
};
