//! Persisted local state
//!
//! Small key-value preferences that outlive a session: the guest identity
//! and the promo banner cooldown. These were once ambient module-level
//! globals; here they are explicit accessors over an injected store so the
//! lifecycle (lazy creation, external persistence) is visible at the call
//! site and testable without real storage.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Namespaced key for the persisted guest identity
pub const GUEST_ID_KEY: &str = "chordial.guest_id";

/// Namespaced key for the banner dismissal timestamp
pub const BANNER_DISMISSED_AT_KEY: &str = "chordial.banner_dismissed_at";

/// Banner re-shows after this many hours
const BANNER_COOLDOWN_HOURS: i64 = 24;

/// String key-value persistence boundary
///
/// Hosts back this with whatever local storage they have; tests use
/// [`MemoryStore`].
pub trait KeyValueStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and ephemeral hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Guest identity, created lazily on first access and reused across sessions
pub fn guest_id(store: &mut dyn KeyValueStore) -> String {
    if let Some(id) = store.get(GUEST_ID_KEY) {
        return id;
    }

    let id = format!("guest:{}", Uuid::new_v4());
    tracing::debug!("Created guest identity {id}");
    store.set(GUEST_ID_KEY, &id);
    id
}

/// Record a banner dismissal at `now`
pub fn dismiss_banner(store: &mut dyn KeyValueStore, now: DateTime<Utc>) {
    store.set(BANNER_DISMISSED_AT_KEY, &now.to_rfc3339());
}

/// Whether the banner should show at `now`
///
/// Visible when never dismissed, when the stored timestamp is unreadable,
/// or once the cooldown has elapsed since the last dismissal.
pub fn banner_visible(store: &dyn KeyValueStore, now: DateTime<Utc>) -> bool {
    let Some(raw) = store.get(BANNER_DISMISSED_AT_KEY) else {
        return true;
    };
    let Ok(dismissed_at) = DateTime::parse_from_rfc3339(&raw) else {
        return true;
    };

    let elapsed = now.signed_duration_since(dismissed_at.with_timezone(&Utc));
    elapsed >= chrono::Duration::hours(BANNER_COOLDOWN_HOURS)
}
