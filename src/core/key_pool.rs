// src/core/key_pool.rs

use secrecy::{ExposeSecret, Secret, SecretString};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Ordered, filtered set of credentials. Immutable after construction.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<SecretString>,
}

impl KeyPool {
    /// Builds the pool from configuration slots in order, dropping absent and
    /// blank values.
    pub fn from_slots<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut skipped = 0usize;
        let keys: Vec<SecretString> = slots
            .into_iter()
            .filter_map(|slot| {
                let key: &str = slot.as_ref().map_or("", |s| s.as_ref()).trim();
                if key.is_empty() {
                    skipped += 1;
                    None
                } else {
                    Some(Secret::new(key.to_string()))
                }
            })
            .collect();

        info!(keys.count = keys.len(), slots.skipped = skipped, "Key pool built");
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in attempt order: the pool rotated left by `start`.
    ///
    /// `start` must be below `len()`.
    pub fn rotated_from(&self, start: usize) -> impl Iterator<Item = &SecretString> {
        let (head, tail) = self.keys.split_at(start);
        tail.iter().chain(head.iter())
    }
}

/// Process-wide rotation offset into the pool.
#[derive(Debug, Default)]
pub struct RotationCursor {
    position: AtomicUsize,
}

impl RotationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current offset and advances it by one, modulo `len`, in a
    /// single atomic step.
    ///
    /// `len` must be non-zero.
    pub fn advance(&self, len: usize) -> usize {
        let previous = self
            .position
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some((current + 1) % len)
            })
            .unwrap_or_else(|current| current);
        let start = previous % len;
        debug!(rotation.start = start, rotation.next = (start + 1) % len, "Advanced rotation cursor");
        start
    }

    /// Offset the next accepted request will start from.
    pub fn position(&self) -> usize {
        self.position.load(Ordering::SeqCst)
    }
}

/// Short, log-safe form of a credential.
pub fn preview_key(key: &str) -> String {
    match (key.get(..4), key.len().checked_sub(4).and_then(|i| key.get(i..))) {
        (Some(head), Some(tail)) if key.len() > 8 => format!("{head}...{tail}"),
        _ => "****".to_string(),
    }
}

/// [`preview_key`] for a secret-wrapped credential.
pub fn preview_secret(key: &SecretString) -> String {
    preview_key(key.expose_secret())
}
