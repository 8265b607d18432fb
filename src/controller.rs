//! Player controller - core orchestration
//!
//! The controller is the single source of truth for "what is currently
//! playing": it owns transport, queue, and section state, decides which
//! provider adapter is active, and mediates every open/play/pause/seek/
//! volume intent from the UI. Adapters report back asynchronously; the
//! controller merges their patches into transport state and reconciles any
//! optimistic updates it made in the meantime.
//!
//! Concurrency model: single-threaded and event-driven. All operations here
//! run synchronously with respect to each other; the only concurrency is
//! between UI intents and provider updates, which the host serializes onto
//! one event loop. The host calls [`PlayerController::tick`] from that loop
//! to drive the debounced switch scheduler and drain pending updates.

use crate::{
    adapter::{ActivateRequest, ProviderAdapter, TaggedUpdate, UpdateSink},
    error::{PlayerError, Result},
    events::PlayerEvent,
    queue::PlayQueue,
    scheduler::{same_target, DebouncedScheduler},
    section::{self, SectionState, TrackSection},
    types::{ControllerState, OpenIntent, PlayTarget, PlayerConfig, Provider, QueueTrack,
        synthetic_track_id, TransportState},
};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A resolved switch, queued behind the debounce window
struct SwitchRequest {
    target: PlayTarget,
    canonical_track_id: String,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    autoplay: bool,
    start_sec: Option<f64>,
}

impl SwitchRequest {
    fn from_intent(target: PlayTarget, intent: OpenIntent) -> Self {
        Self {
            target,
            canonical_track_id: intent.canonical_track_id,
            title: intent.title,
            artist: intent.artist,
            album: intent.album,
            autoplay: intent.autoplay,
            start_sec: intent.start_sec.map(|s| s.max(0.0)),
        }
    }
}

/// Cross-provider playback orchestrator
///
/// Owns the transport/queue/section state that all UI reads, and the
/// registered provider adapters. At most one adapter is active (receiving
/// transport commands) at any instant; switching the active pointer is
/// synchronous even when the underlying teardown and setup are not.
///
/// Every operation is safe without an active adapter: transport commands
/// degrade to no-ops rather than panicking, because the UI fires them
/// speculatively while a provider is still activating.
pub struct PlayerController {
    config: PlayerConfig,

    // State owned by the controller, read-only to consumers
    state: ControllerState,
    is_open: bool,
    transport: TransportState,
    queue: PlayQueue,
    sections: Vec<TrackSection>,
    section_state: SectionState,

    // Adapters and the single active-target pointer
    adapters: HashMap<Provider, Box<dyn ProviderAdapter>>,
    active: Option<PlayTarget>,

    // Monotonic activation generation; updates from older generations are
    // stale and dropped
    generation: u64,
    updates_tx: Sender<TaggedUpdate>,
    updates_rx: Receiver<TaggedUpdate>,

    switcher: DebouncedScheduler<SwitchRequest>,
    pending_events: Vec<PlayerEvent>,
}

impl PlayerController {
    /// Create a controller with the given configuration
    pub fn new(config: PlayerConfig) -> Self {
        let (updates_tx, updates_rx) = channel();
        let transport = TransportState {
            volume: config.volume.clamp(0.0, 1.0),
            ..TransportState::default()
        };
        let switcher = DebouncedScheduler::new(config.switch_debounce);

        Self {
            config,
            state: ControllerState::Closed,
            is_open: false,
            transport,
            queue: PlayQueue::new(),
            sections: Vec::new(),
            section_state: SectionState::default(),
            adapters: HashMap::new(),
            active: None,
            generation: 0,
            updates_tx,
            updates_rx,
            switcher,
            pending_events: Vec::new(),
        }
    }

    /// Register the adapter for a provider
    ///
    /// One adapter per provider; a second registration replaces the first.
    pub fn register_adapter(&mut self, adapter: Box<dyn ProviderAdapter>) {
        let provider = adapter.provider();
        tracing::debug!("Registered adapter for {provider}");
        self.adapters.insert(provider, adapter);
    }

    // ===== Transport Intents =====

    /// Open the player for a track
    ///
    /// If the resolved target differs from the current one, the previous
    /// adapter is deactivated before the new one activates (debounced, so
    /// only the last target of a rapid burst ever reaches the adapters).
    /// The same target is a no-op switch, still applying `start_sec` as a
    /// seek when given. An intent with no playback target opens the shell
    /// without activating anything.
    pub fn open(&mut self, intent: OpenIntent) {
        self.is_open = true;

        match intent.target() {
            Some(target) => {
                if same_target(self.active.as_ref(), Some(&target)) {
                    // The latest intent wants what is already active; any
                    // switch still settling is superseded and must not fire
                    self.switcher.cancel();
                    if let Some(start_sec) = intent.start_sec {
                        self.seek_to_secs(start_sec);
                    }
                    return;
                }
                self.request_switch(SwitchRequest::from_intent(target, intent));
            }
            None => {
                let previous = self.transport.canonical_track_id.clone();
                if previous.as_ref() != Some(&intent.canonical_track_id) {
                    self.clear_sections_for_track_change();
                    self.transport.canonical_track_id = Some(intent.canonical_track_id.clone());
                    self.transport.title = intent.title;
                    self.transport.artist = intent.artist;
                    self.transport.album = intent.album;
                    self.emit(PlayerEvent::TrackChanged {
                        canonical_track_id: Some(intent.canonical_track_id),
                        previous_track_id: previous,
                    });
                }
            }
        }
    }

    /// Play a target, resuming when it is already active
    ///
    /// Same target-resolution rule as [`open`](Self::open); when the target
    /// is already active this issues a plain resume instead of reactivating.
    /// An intent with no concrete target is a no-op, not an error.
    pub fn play(&mut self, intent: OpenIntent) {
        let Some(target) = intent.target() else {
            tracing::debug!("Ignoring play intent without a concrete target");
            return;
        };
        self.is_open = true;

        if same_target(self.active.as_ref(), Some(&target)) {
            self.switcher.cancel();
            self.resume_active(intent.start_sec);
            return;
        }

        let mut request = SwitchRequest::from_intent(target, intent);
        request.autoplay = true;
        self.request_switch(request);
    }

    /// Resume the active adapter, optionally from a position in seconds
    ///
    /// Safe no-op when nothing is active. The play state flips
    /// optimistically and is reconciled by the adapter's next update.
    pub fn resume(&mut self) {
        self.resume_active(None);
    }

    /// Pause playback; no-op when nothing is active
    pub fn pause(&mut self) {
        let Some(provider) = self.active.as_ref().map(|t| t.provider) else {
            return;
        };
        if let Some(adapter) = self.adapters.get_mut(&provider) {
            adapter.pause();
        }
        self.transport.is_playing = false;
        self.set_state(ControllerState::Paused);
    }

    /// Stop playback and clear transport, queue position, and section state
    ///
    /// The queue's contents survive; only the current marker clears. Volume
    /// and mute are player-level settings and survive too.
    pub fn stop(&mut self) {
        self.switcher.cancel();
        self.deactivate_active();

        let previous = self.transport.canonical_track_id.take();
        let had_provider = self.transport.provider.is_some();
        let had_marker = self.queue.current_index().is_some();
        self.transport = TransportState {
            volume: self.transport.volume,
            is_muted: self.transport.is_muted,
            ..TransportState::default()
        };
        self.queue.clear_current();
        self.sections.clear();
        self.section_state = SectionState::default();

        if previous.is_some() {
            self.emit(PlayerEvent::TrackChanged {
                canonical_track_id: None,
                previous_track_id: previous,
            });
        }
        if had_provider {
            self.emit(PlayerEvent::ProviderChanged { provider: None });
        }
        if had_marker {
            self.emit_queue_changed();
        }
        self.set_state(ControllerState::Closed);
    }

    /// Stop and close the player shell
    pub fn close(&mut self) {
        self.stop();
        self.is_open = false;
    }

    /// Force a provider change regardless of current playing state
    ///
    /// Follows the same deactivate-then-activate discipline as `open` but
    /// bypasses the debounce window. Without a canonical id the synthetic
    /// provider-scoped id stands in.
    pub fn switch_provider(
        &mut self,
        provider: Provider,
        provider_track_id: String,
        canonical_track_id: Option<String>,
    ) {
        self.is_open = true;
        self.switcher.cancel();

        let canonical = canonical_track_id
            .unwrap_or_else(|| synthetic_track_id(provider, &provider_track_id));
        let target = PlayTarget::new(provider, provider_track_id);
        self.apply_switch(SwitchRequest {
            target,
            canonical_track_id: canonical,
            title: None,
            artist: None,
            album: None,
            autoplay: true,
            start_sec: None,
        });
    }

    /// Seek to a position in milliseconds
    ///
    /// Clamps to the known duration, updates `position_ms` optimistically,
    /// and forwards seconds to the active adapter. Safe no-op on the
    /// adapter side when nothing is active; the optimistic position still
    /// applies.
    pub fn seek_to_ms(&mut self, ms: u64) {
        let clamped = if self.transport.duration_ms > 0 {
            ms.min(self.transport.duration_ms)
        } else {
            ms
        };
        self.transport.position_ms = clamped;

        if let Some(provider) = self.active.as_ref().map(|t| t.provider) {
            if let Some(adapter) = self.adapters.get_mut(&provider) {
                adapter.seek_to(clamped as f64 / 1000.0);
            }
        }
        self.emit(PlayerEvent::PositionChanged {
            position_ms: self.transport.position_ms,
            duration_ms: self.transport.duration_ms,
        });
    }

    /// Seek to a position in seconds; negative values clamp to zero
    pub fn seek_to_secs(&mut self, seconds: f64) {
        let seconds = seconds.max(0.0);
        self.seek_to_ms((seconds * 1000.0).round() as u64);
    }

    /// Set volume, clamped to `[0.0, 1.0]`
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.transport.volume = volume;

        if let Some(provider) = self.active.as_ref().map(|t| t.provider) {
            if let Some(adapter) = self.adapters.get_mut(&provider) {
                adapter.set_volume(volume);
            }
        }
        self.emit_volume_changed();
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        self.transport.is_muted = muted;

        if let Some(provider) = self.active.as_ref().map(|t| t.provider) {
            if let Some(adapter) = self.adapters.get_mut(&provider) {
                adapter.set_mute(muted);
            }
        }
        self.emit_volume_changed();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        let muted = !self.transport.is_muted;
        self.set_muted(muted);
    }

    // ===== Sections =====

    /// Replace the section list for the current track
    pub fn set_sections(&mut self, sections: Vec<TrackSection>) {
        self.sections = sections;
    }

    /// Select a section explicitly, or `None` to derive from position
    pub fn set_current_section(&mut self, section_id: Option<String>) {
        if self.section_state.current_section_id != section_id {
            self.section_state.current_section_id = section_id.clone();
            self.emit(PlayerEvent::SectionChanged { section_id });
        }
    }

    /// Set or clear the looped section
    ///
    /// While set, a position update landing outside the section's range
    /// seeks playback back to the section start.
    pub fn set_loop_section(&mut self, section_id: Option<String>) {
        self.section_state.loop_section_id = section_id;
    }

    /// The section to highlight right now
    ///
    /// Explicit selection wins; otherwise derived from the playback
    /// position against the section boundaries.
    pub fn active_section(&self) -> Option<&TrackSection> {
        section::active_section(
            &self.sections,
            self.transport.position_ms,
            self.section_state.current_section_id.as_deref(),
        )
    }

    // ===== Queue =====

    /// Insert a track right after the current queue entry
    pub fn enqueue_next(&mut self, track: QueueTrack) {
        self.queue.enqueue_next(track);
        self.emit_queue_changed();
    }

    /// Append a track to the end of the queue
    pub fn enqueue_later(&mut self, track: QueueTrack) {
        self.queue.enqueue_later(track);
        self.emit_queue_changed();
    }

    /// Remove the queue entry at an index
    pub fn remove_from_queue(&mut self, index: usize) -> Result<QueueTrack> {
        let track = self.queue.remove(index)?;
        self.emit_queue_changed();
        Ok(track)
    }

    /// Move a queue entry from one index to another
    pub fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.queue.reorder(from, to)?;
        self.emit_queue_changed();
        Ok(())
    }

    /// Clear the queue entirely
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit_queue_changed();
    }

    /// Shuffle the queue, preserving the currently playing entry
    ///
    /// The playing entry may move position but keeps its identity, so
    /// playback never glitches across a shuffle.
    pub fn shuffle_queue(&mut self) {
        self.queue.shuffle();
        self.emit_queue_changed();
    }

    /// Advance to the next queue entry and play it
    pub fn next_track(&mut self) -> Result<()> {
        let intent = match self.queue.advance() {
            Some(track) => track.to_intent(),
            None => return Err(PlayerError::QueueEmpty),
        };
        self.emit_queue_changed();
        self.play(intent);
        Ok(())
    }

    /// Step back in the queue, or restart the current track
    ///
    /// Past the configured restart threshold this restarts the current
    /// track instead of navigating, matching standard previous-button UX.
    pub fn previous_track(&mut self) -> Result<()> {
        let threshold_ms = self.config.restart_threshold.as_millis() as u64;
        if self.active.is_some() && self.transport.position_ms > threshold_ms {
            self.seek_to_ms(0);
            return Ok(());
        }

        let intent = match self.queue.retreat() {
            Some(track) => track.to_intent(),
            None => return Err(PlayerError::QueueEmpty),
        };
        self.emit_queue_changed();
        self.play(intent);
        Ok(())
    }

    /// Jump to a queue entry by index and play it
    pub fn play_queue_index(&mut self, index: usize) -> Result<()> {
        let intent = self.queue.jump_to(index)?.to_intent();
        self.emit_queue_changed();
        self.play(intent);
        Ok(())
    }

    // ===== Provider Updates =====

    /// Drive pending work: settle debounced switches, drain adapter updates
    ///
    /// Hosts call this from their event loop. With a zero debounce window
    /// switches apply synchronously inside the intent call and `tick` only
    /// drains updates.
    pub fn tick(&mut self) {
        if let Some(request) = self.switcher.poll() {
            self.apply_switch(request);
        }
        self.poll_updates();
    }

    /// Drain and merge all queued provider updates
    pub fn poll_updates(&mut self) {
        while let Ok(tagged) = self.updates_rx.try_recv() {
            self.apply_update(tagged);
        }
    }

    /// Merge one provider patch into transport state
    ///
    /// Patches from a superseded activation generation, or from a provider
    /// other than the active one, are dropped: a torn-down or stuck adapter
    /// can never mutate state behind the controller's back.
    pub fn apply_update(&mut self, tagged: TaggedUpdate) {
        if tagged.generation != self.generation {
            tracing::debug!(
                "Dropping stale update from {} (generation {} != {})",
                tagged.provider,
                tagged.generation,
                self.generation
            );
            return;
        }
        let Some(active_provider) = self.active.as_ref().map(|t| t.provider) else {
            return;
        };
        if active_provider != tagged.provider {
            tracing::warn!(
                "Dropping update from inactive provider {}",
                tagged.provider
            );
            return;
        }

        let update = tagged.update;
        let mut position_changed = false;
        let mut volume_changed = false;

        if let Some(duration_ms) = update.duration_ms {
            if duration_ms != self.transport.duration_ms {
                self.transport.duration_ms = duration_ms;
                position_changed = true;
            }
        }
        if let Some(position_ms) = update.position_ms {
            let clamped = if self.transport.duration_ms > 0 {
                position_ms.min(self.transport.duration_ms)
            } else {
                position_ms
            };
            self.transport.position_ms = clamped;
            position_changed = true;
        } else if position_changed && self.transport.duration_ms > 0 {
            // Duration arrived late; re-clamp the position we already hold
            self.transport.position_ms =
                self.transport.position_ms.min(self.transport.duration_ms);
        }

        if let Some(is_playing) = update.is_playing {
            self.transport.is_playing = is_playing;
            let state = if is_playing {
                ControllerState::Playing
            } else {
                ControllerState::Paused
            };
            self.set_state(state);
        }

        if let Some(volume) = update.volume {
            self.transport.volume = volume.clamp(0.0, 1.0);
            volume_changed = true;
        }
        if let Some(muted) = update.is_muted {
            self.transport.is_muted = muted;
            volume_changed = true;
        }
        if volume_changed {
            self.emit_volume_changed();
        }

        if let Some(track_id) = update.track_id {
            self.transport.provider_track_id = Some(track_id);
        }
        if let Some(title) = update.title {
            self.transport.title = Some(title);
        }
        if let Some(artist) = update.artist {
            self.transport.artist = Some(artist);
        }

        if position_changed {
            self.emit(PlayerEvent::PositionChanged {
                position_ms: self.transport.position_ms,
                duration_ms: self.transport.duration_ms,
            });
            self.enforce_loop_section();
        }
    }

    // ===== State Queries =====

    /// Transport state (read-only view)
    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    /// Current transport lifecycle state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether the player shell is open
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The play queue (read-only view)
    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    /// Sections loaded for the current track
    pub fn sections(&self) -> &[TrackSection] {
        &self.sections
    }

    /// Section selection and loop state
    pub fn section_state(&self) -> &SectionState {
        &self.section_state
    }

    /// The provider currently receiving transport commands, if any
    pub fn active_provider(&self) -> Option<Provider> {
        self.active.as_ref().map(|t| t.provider)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn request_switch(&mut self, request: SwitchRequest) {
        self.switcher.request(request);
        // A zero debounce window settles immediately
        if let Some(request) = self.switcher.poll() {
            self.apply_switch(request);
        }
    }

    /// Deactivate the previous adapter, then activate the new target
    ///
    /// The active pointer swap and generation bump happen synchronously, so
    /// at most one adapter's controls ever receive transport commands and
    /// any update still in flight from the old activation is stale on
    /// arrival. Teardown and setup themselves are fire-and-forget.
    fn apply_switch(&mut self, request: SwitchRequest) {
        self.deactivate_active();

        let provider = request.target.provider;
        let previous_track = self.transport.canonical_track_id.clone();
        let track_changed = previous_track.as_ref() != Some(&request.canonical_track_id);
        let previous_provider = self.transport.provider;

        if track_changed {
            self.clear_sections_for_track_change();
        }

        let start_ms = request
            .start_sec
            .map(|s| (s * 1000.0).round() as u64)
            .unwrap_or(0);
        self.transport.provider = Some(provider);
        self.transport.provider_track_id = Some(request.target.track_id.clone());
        self.transport.canonical_track_id = Some(request.canonical_track_id.clone());
        self.transport.title = request.title;
        self.transport.artist = request.artist;
        self.transport.album = request.album;
        self.transport.is_playing = false;
        self.transport.position_ms = start_ms;
        self.transport.duration_ms = 0;

        tracing::info!(
            "Switching playback to {} track {}",
            provider,
            request.target.track_id
        );

        let volume = self.transport.volume;
        let muted = self.transport.is_muted;
        let sink = UpdateSink::new(provider, self.generation, self.updates_tx.clone());

        match self.adapters.get_mut(&provider) {
            Some(adapter) => {
                adapter.activate(
                    ActivateRequest {
                        provider_track_id: request.target.track_id.clone(),
                        autoplay: request.autoplay,
                        start_sec: request.start_sec,
                    },
                    sink,
                );
                adapter.set_volume(volume);
                adapter.set_mute(muted);
                self.active = Some(request.target);
            }
            None => {
                // No adapter registered: nothing plays, but the controller
                // stays responsive to the next open
                tracing::warn!("No adapter registered for {provider}");
            }
        }

        if previous_provider != Some(provider) {
            self.emit(PlayerEvent::ProviderChanged {
                provider: Some(provider),
            });
        }
        if track_changed {
            self.emit(PlayerEvent::TrackChanged {
                canonical_track_id: Some(request.canonical_track_id),
                previous_track_id: previous_track,
            });
        }
        self.set_state(ControllerState::Opening);
    }

    /// Deactivate the active adapter and invalidate in-flight updates
    fn deactivate_active(&mut self) {
        self.generation += 1;
        if let Some(previous) = self.active.take() {
            tracing::debug!("Deactivating {} adapter", previous.provider);
            if let Some(adapter) = self.adapters.get_mut(&previous.provider) {
                adapter.deactivate();
            }
        }
    }

    fn resume_active(&mut self, start_sec: Option<f64>) {
        let Some(provider) = self.active.as_ref().map(|t| t.provider) else {
            return;
        };
        if let Some(adapter) = self.adapters.get_mut(&provider) {
            adapter.play(start_sec.map(|s| s.max(0.0)));
        }
        if let Some(start_sec) = start_sec {
            self.transport.position_ms = (start_sec.max(0.0) * 1000.0).round() as u64;
        }
        self.transport.is_playing = true;
        self.set_state(ControllerState::Playing);
    }

    fn enforce_loop_section(&mut self) {
        let Some(loop_id) = self.section_state.loop_section_id.clone() else {
            return;
        };
        if let Some(start_ms) =
            section::loop_target(&self.sections, &loop_id, self.transport.position_ms)
        {
            tracing::debug!("Loop section {loop_id} exited, seeking back to {start_ms}ms");
            self.seek_to_ms(start_ms);
        }
    }

    fn clear_sections_for_track_change(&mut self) {
        self.sections.clear();
        if self.section_state != SectionState::default() {
            self.section_state = SectionState::default();
            self.emit(PlayerEvent::SectionChanged { section_id: None });
        }
    }

    fn set_state(&mut self, state: ControllerState) {
        if self.state != state {
            self.state = state;
            self.emit(PlayerEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.transport.volume,
            is_muted: self.transport.is_muted,
        });
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
        });
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}
