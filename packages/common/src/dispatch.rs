//! # Converter Dispatch
//!
//! The protocol shared by the parsing and rendering engines.
//!
//! ## Registry
//!
//! Converters are kept in an ordered list. Predicate-gated converters are
//! tried most-recently-registered first; the single unconditional default
//! always sits last and accepts everything, so every item gets *some*
//! result.
//!
//! ```text
//! index:   0          1          2
//!        [ B (newest), A,         default ]
//! ```
//!
//! Selection starts at a given index, which is how "continue with the next
//! converter" works: a converter running at index `i` asks for the first
//! match at `i + 1`.
//!
//! ## Memo
//!
//! Within a run each item is converted at most once. The first request
//! starts the conversion and stores a shared handle to it; later requests
//! for the same key, including concurrent ones, await that same handle.
//!
//! A pending conversion usually holds the run that owns the memo, so an
//! abandoned run keeps itself alive until the memo is emptied. Engines take
//! a [`MemoReset`] for the length of the run to break that cycle.

use crate::{DispatchError, DispatchResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

struct Entry<P, C: ?Sized> {
    predicate: P,
    converter: Arc<C>,
}

impl<P: Clone, C: ?Sized> Clone for Entry<P, C> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            converter: Arc::clone(&self.converter),
        }
    }
}

/// Ordered converter list with a mandatory default.
pub struct Registry<P, C: ?Sized> {
    conditional: Vec<Entry<P, C>>,
    fallback: Arc<C>,
}

impl<P: Clone, C: ?Sized> Clone for Registry<P, C> {
    fn clone(&self) -> Self {
        Self {
            conditional: self.conditional.clone(),
            fallback: Arc::clone(&self.fallback),
        }
    }
}

/// A converter chosen for an item, with its position in the chain.
pub struct Selected<C: ?Sized> {
    pub index: usize,
    pub converter: Arc<C>,
}

impl<P, C: ?Sized> Registry<P, C> {
    pub fn new(fallback: Arc<C>) -> Self {
        Self {
            conditional: Vec::new(),
            fallback,
        }
    }

    /// Put a converter ahead of every previously registered one.
    ///
    /// `name` is only used for the error when `predicate` is `None`.
    pub fn register(
        &mut self,
        name: &str,
        predicate: Option<P>,
        converter: Arc<C>,
    ) -> DispatchResult<()> {
        let predicate = predicate.ok_or_else(|| DispatchError::missing_predicate(name))?;
        self.conditional.insert(0, Entry {
            predicate,
            converter,
        });
        Ok(())
    }

    /// Replace the default converter.
    pub fn set_fallback(&mut self, converter: Arc<C>) {
        self.fallback = converter;
    }

    pub fn fallback(&self) -> &Arc<C> {
        &self.fallback
    }

    /// Number of converters, default included.
    pub fn len(&self) -> usize {
        self.conditional.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the default converter.
    pub fn fallback_index(&self) -> usize {
        self.conditional.len()
    }

    /// First converter at or after `from` whose predicate `accepts`. The
    /// default accepts everything; `None` only when `from` is past it.
    pub fn select(&self, from: usize, accepts: impl Fn(&P) -> bool) -> Option<Selected<C>> {
        let hit = self
            .conditional
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, entry)| accepts(&entry.predicate));

        if let Some((index, entry)) = hit {
            return Some(Selected {
                index,
                converter: Arc::clone(&entry.converter),
            });
        }

        (from <= self.fallback_index()).then(|| Selected {
            index: self.fallback_index(),
            converter: Arc::clone(&self.fallback),
        })
    }
}

/// Handle to a conversion that may still be running.
pub type SharedConversion<T> = Shared<BoxFuture<'static, T>>;

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Conversions started (memo misses).
    pub conversions: usize,
    /// Requests answered from the memo.
    pub memo_hits: usize,
}

/// Per-run memo table keyed by item identity.
pub struct Memo<K, T> {
    entries: Mutex<HashMap<K, SharedConversion<T>>>,
    conversions: AtomicUsize,
    hits: AtomicUsize,
}

impl<K, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            conversions: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        }
    }
}

impl<K, T> Memo<K, T> {
    /// Drop every stored conversion. Counters are kept.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.lock());
        // Dropped outside the lock: a conversion may own the memo's run.
        drop(entries);
    }

    /// Guard that clears the memo when it goes out of scope, whether the
    /// run finished or its future was dropped.
    pub fn clear_on_drop(&self) -> MemoReset<'_, K, T> {
        MemoReset { memo: self }
    }
}

pub struct MemoReset<'a, K, T> {
    memo: &'a Memo<K, T>,
}

impl<K, T> Drop for MemoReset<'_, K, T> {
    fn drop(&mut self) {
        self.memo.clear();
    }
}

impl<K, T> Memo<K, T>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the conversion for `key`, starting it with `start` if this is
    /// the first request.
    ///
    /// `start` must build the future lazily; it is called under the memo
    /// lock and must not poll anything.
    pub fn get_or_start(
        &self,
        key: K,
        start: impl FnOnce() -> BoxFuture<'static, T>,
    ) -> SharedConversion<T> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(?key, "Memo hit");
            return existing.clone();
        }
        self.conversions.fetch_add(1, Ordering::Relaxed);
        let shared = start().shared();
        entries.insert(key, shared.clone());
        shared
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            conversions: self.conversions.load(Ordering::Relaxed),
            memo_hits: self.hits.load(Ordering::Relaxed),
        }
    }
}
