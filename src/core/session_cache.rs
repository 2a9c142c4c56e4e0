//! Bounded, time-expiring store of conversation sessions

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::core::models::{ChatMessage, Role};
use crate::core::prompts::DEFAULT_SESSION_PROMPT;

/// Default number of sessions kept
pub const DEFAULT_CAPACITY: usize = 100;

/// Default lifetime of a session entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Entry {
    messages: Vec<ChatMessage>,
    expires_at: Instant,
    /// Insertion sequence, smallest is evicted first
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

impl Inner {
    fn purge_expired(&mut self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        let purged = before - self.entries.len();
        if purged > 0 {
            debug!("Expired {} session(s)", purged);
        }
    }

    fn live_mut(&mut self, id: &str, now: Instant) -> Option<&mut Entry> {
        if self.entries.get(id).is_some_and(|e| e.expires_at <= now) {
            self.entries.remove(id);
        }
        self.entries.get_mut(id)
    }

    fn insert(&mut self, id: &str, messages: Vec<ChatMessage>, expires_at: Instant, capacity: usize) {
        if !self.entries.contains_key(id) && self.entries.len() >= capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone())
            {
                debug!("Session cache full, evicting {}", oldest);
                self.entries.remove(&oldest);
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            id.to_string(),
            Entry {
                messages,
                expires_at,
                seq,
            },
        );
    }
}

/// Session histories keyed by an opaque id.
///
/// Entries expire `ttl` after they were last stored; expiry is checked lazily on access.
/// When `capacity` is reached the oldest stored entry is evicted.
#[derive(Debug)]
pub struct SessionCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache {
    /// Cache with 100 entries and a one hour TTL
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Cache holding at most `capacity` sessions (minimum 1), each living `ttl`
    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Get-or-create a session and append `message` as a user turn.
    ///
    /// A new session is seeded with the default system message. Appending
    /// does not extend the entry's lifetime.
    pub fn get_session(&self, session_id: &str, message: &str) -> Vec<ChatMessage> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        if let Some(entry) = inner.live_mut(session_id, now) {
            entry.messages.push(ChatMessage::user(message));
            return entry.messages.clone();
        }

        inner.purge_expired(now);
        let messages = vec![
            ChatMessage::system(DEFAULT_SESSION_PROMPT),
            ChatMessage::user(message),
        ];
        inner.insert(session_id, messages.clone(), now + self.ttl, self.capacity);
        messages
    }

    /// Append an assistant turn to an existing session and refresh its lifetime
    pub fn save_session(&self, session_id: &str, message: &str) {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let Some(entry) = inner.live_mut(session_id, now) else {
            return;
        };
        let mut messages = std::mem::take(&mut entry.messages);
        messages.push(ChatMessage::assistant(message));
        inner.insert(session_id, messages, now + self.ttl, self.capacity);
    }

    /// Undo the user turn appended by [`SessionCache::get_session`].
    ///
    /// A session left with only its system message is removed, as if never created.
    pub fn discard_user_turn(&self, session_id: &str) {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let Some(entry) = inner.live_mut(session_id, now) else {
            return;
        };
        if entry.messages.last().map(|m| m.role) != Some(Role::User) {
            return;
        }
        entry.messages.pop();
        if entry.messages.len() <= 1 {
            inner.entries.remove(session_id);
            debug!("Dropped unanswered session {}", session_id);
        }
    }

    /// Remove a session if present
    pub fn clear_session(&self, session_id: &str) {
        if self.inner.lock().entries.remove(session_id).is_some() {
            debug!("Cleared session {}", session_id);
        }
    }

    /// History of a live session
    pub fn messages(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        let now = Instant::now();
        self.inner
            .lock()
            .live_mut(session_id, now)
            .map(|e| e.messages.clone())
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.purge_expired(Instant::now());
        inner.entries.len()
    }

    /// Whether no live session remains
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
