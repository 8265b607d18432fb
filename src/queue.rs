//! Play queue
//!
//! Ordered playback sequence with current-index tracking. The queue is pure
//! state: it never talks to adapters. The controller triggers playback for
//! whatever entry navigation lands on.

use crate::error::{PlayerError, Result};
use crate::types::QueueTrack;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Ordered playback sequence with a current position
///
/// Invariant after every operation: `current_index()` is `None` (no current
/// track) or a valid index into `tracks()`.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    tracks: Vec<QueueTrack>,
    current: Option<usize>,
}

impl PlayQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// All tracks in queue order
    pub fn tracks(&self) -> &[QueueTrack] {
        &self.tracks
    }

    /// Index of the current track, if any
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current track, if any
    pub fn current(&self) -> Option<&QueueTrack> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Number of tracks in the queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Insert a track right after the current one
    ///
    /// With no current track the entry goes to the front.
    pub fn enqueue_next(&mut self, track: QueueTrack) {
        let at = match self.current {
            Some(i) => i + 1,
            None => 0,
        };
        self.tracks.insert(at, track);
    }

    /// Append a track to the end of the queue
    pub fn enqueue_later(&mut self, track: QueueTrack) {
        self.tracks.push(track);
    }

    /// Remove the track at an index
    ///
    /// The current marker follows its track: removing an entry before it
    /// shifts it down; removing the current entry moves the marker to the
    /// following track (or clears it when none remains).
    pub fn remove(&mut self, index: usize) -> Result<QueueTrack> {
        if index >= self.tracks.len() {
            return Err(PlayerError::IndexOutOfBounds(index));
        }

        let track = self.tracks.remove(index);

        self.current = match self.current {
            Some(c) if index < c => Some(c - 1),
            Some(c) if index == c => {
                if self.tracks.is_empty() {
                    None
                } else {
                    Some(c.min(self.tracks.len() - 1))
                }
            }
            other => other,
        };

        Ok(track)
    }

    /// Move a track from one index to another
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tracks.len();
        if from >= len {
            return Err(PlayerError::IndexOutOfBounds(from));
        }
        if to >= len {
            return Err(PlayerError::IndexOutOfBounds(to));
        }
        if from == to {
            return Ok(());
        }

        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);

        // Keep the marker on the same track through the shift
        self.current = self.current.map(|c| {
            if c == from {
                to
            } else if from < c && to >= c {
                c - 1
            } else if from > c && to <= c {
                c + 1
            } else {
                c
            }
        });

        Ok(())
    }

    /// Clear all tracks and the current marker
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    /// Clear only the current marker, keeping the tracks
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Shuffle the queue, preserving the current entry's identity
    ///
    /// The current track may move position but the marker follows it, so
    /// playback never glitches across a shuffle. Uniform Fisher-Yates over
    /// the whole sequence.
    pub fn shuffle(&mut self) {
        let current_id = self.current().map(|t| t.id.clone());

        self.tracks.shuffle(&mut thread_rng());

        self.current = match current_id {
            Some(id) => self.tracks.iter().position(|t| t.id == id),
            None => None,
        };
    }

    /// Advance to the next track
    ///
    /// With no current marker, starts at the front. Returns the new current
    /// track, or `None` at the end of the queue (marker unchanged).
    pub fn advance(&mut self) -> Option<&QueueTrack> {
        let next = match self.current {
            None if !self.tracks.is_empty() => 0,
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => return None,
        };
        self.current = Some(next);
        self.tracks.get(next)
    }

    /// Step back to the previous track
    ///
    /// Returns the new current track, or `None` at the front of the queue
    /// (marker unchanged).
    pub fn retreat(&mut self) -> Option<&QueueTrack> {
        let prev = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => return None,
        };
        self.current = Some(prev);
        self.tracks.get(prev)
    }

    /// Move the marker to an arbitrary index
    pub fn jump_to(&mut self, index: usize) -> Result<&QueueTrack> {
        if index >= self.tracks.len() {
            return Err(PlayerError::IndexOutOfBounds(index));
        }
        self.current = Some(index);
        Ok(&self.tracks[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    fn track(id: &str) -> QueueTrack {
        QueueTrack {
            id: id.to_string(),
            provider: Provider::Spotify,
            provider_track_id: format!("sp-{id}"),
            title: format!("Track {id}"),
            artist: "Test Artist".to_string(),
            album: None,
            duration_ms: Some(180_000),
        }
    }

    fn queue_of(ids: &[&str]) -> PlayQueue {
        let mut queue = PlayQueue::new();
        for id in ids {
            queue.enqueue_later(track(id));
        }
        queue
    }

    #[test]
    fn empty_queue() {
        let queue = PlayQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn enqueue_next_inserts_after_current() {
        let mut queue = queue_of(&["1", "2", "3"]);
        queue.jump_to(1).unwrap();

        queue.enqueue_next(track("x"));

        let ids: Vec<&str> = queue.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "x", "3"]);
        assert_eq!(queue.current().unwrap().id, "2");
    }

    #[test]
    fn enqueue_next_without_current_goes_first() {
        let mut queue = queue_of(&["1"]);
        queue.enqueue_next(track("x"));

        assert_eq!(queue.tracks()[0].id, "x");
    }

    #[test]
    fn remove_before_current_shifts_marker() {
        let mut queue = queue_of(&["1", "2", "3"]);
        queue.jump_to(2).unwrap();

        queue.remove(0).unwrap();

        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.current().unwrap().id, "3");
    }

    #[test]
    fn remove_current_moves_to_following() {
        let mut queue = queue_of(&["1", "2", "3"]);
        queue.jump_to(1).unwrap();

        let removed = queue.remove(1).unwrap();
        assert_eq!(removed.id, "2");
        assert_eq!(queue.current().unwrap().id, "3");
    }

    #[test]
    fn remove_last_current_clamps() {
        let mut queue = queue_of(&["1", "2"]);
        queue.jump_to(1).unwrap();

        queue.remove(1).unwrap();
        assert_eq!(queue.current().unwrap().id, "1");

        queue.remove(0).unwrap();
        assert_eq!(queue.current_index(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_out_of_bounds() {
        let mut queue = queue_of(&["1"]);
        assert!(queue.remove(5).is_err());
    }

    #[test]
    fn reorder_follows_current() {
        let mut queue = queue_of(&["1", "2", "3", "4"]);
        queue.jump_to(1).unwrap();

        // Move the current track itself
        queue.reorder(1, 3).unwrap();
        assert_eq!(queue.current().unwrap().id, "2");
        assert_eq!(queue.current_index(), Some(3));

        // Move another track across the marker
        queue.reorder(0, 3).unwrap();
        assert_eq!(queue.current().unwrap().id, "2");
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let mut queue = queue_of(&["1", "2"]);
        queue.jump_to(0).unwrap();
        queue.reorder(1, 1).unwrap();
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn advance_and_retreat() {
        let mut queue = queue_of(&["1", "2"]);

        assert_eq!(queue.advance().unwrap().id, "1");
        assert_eq!(queue.advance().unwrap().id, "2");
        assert!(queue.advance().is_none());
        assert_eq!(queue.current().unwrap().id, "2");

        assert_eq!(queue.retreat().unwrap().id, "1");
        assert!(queue.retreat().is_none());
        assert_eq!(queue.current().unwrap().id, "1");
    }

    #[test]
    fn shuffle_preserves_current_identity() {
        let mut queue = queue_of(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        queue.jump_to(3).unwrap();
        let playing = queue.current().unwrap().id.clone();

        queue.shuffle();

        assert_eq!(queue.len(), 8);
        assert_eq!(queue.current().unwrap().id, playing);
    }

    #[test]
    fn shuffle_without_current() {
        let mut queue = queue_of(&["1", "2", "3"]);
        queue.shuffle();
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.len(), 3);
    }
}
