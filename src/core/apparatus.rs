//! Shared, quantity-limited cooking apparatus.
//!
//! Each [`Apparatus`] tracks its in-use count with a lock-free `AtomicU32`
//! and a compare-and-swap loop, so `0 <= in_use <= quantity` holds for any
//! number of concurrent callers. Waiters park on a per-apparatus
//! `tokio::sync::Notify` that is signalled on every release; the wait is
//! bounded by the retry interval so a lost wake-up degrades to polling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::core::model::ApparatusSpec;

/// A named apparatus with a fixed number of slots.
#[derive(Debug)]
pub struct Apparatus {
    name: String,
    quantity: u32,
    in_use: AtomicU32,
    peak_in_use: AtomicU32,
    released: Notify,
}

impl Apparatus {
    /// Create an apparatus with `quantity` free slots.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            in_use: AtomicU32::new(0),
            peak_in_use: AtomicU32::new(0),
            released: Notify::new(),
        }
    }

    /// Apparatus name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total slots.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Slots currently taken.
    #[must_use]
    pub fn in_use(&self) -> u32 {
        self.in_use.load(Ordering::Acquire)
    }

    /// Highest number of slots ever taken at once.
    #[must_use]
    pub fn peak_in_use(&self) -> u32 {
        self.peak_in_use.load(Ordering::Acquire)
    }

    /// Take a slot if one is free. Never blocks.
    pub fn try_use(&self) -> bool {
        let mut current = self.in_use.load(Ordering::Acquire);
        loop {
            if current >= self.quantity {
                return false;
            }
            match self.in_use.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.peak_in_use.fetch_max(current + 1, Ordering::AcqRel);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Give a slot back and wake one waiter.
    pub fn release(&self) {
        let released = self
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if released.is_err() {
            tracing::warn!(apparatus = %self.name, "release without matching use");
            return;
        }
        self.released.notify_one();
    }

    /// Wait until a slot is taken.
    ///
    /// Each failed attempt waits for a release notification, at most
    /// `retry` long, then tries again.
    pub async fn acquire(&self, retry: Duration) {
        loop {
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.try_use() {
                return;
            }
            tracing::trace!(apparatus = %self.name, "apparatus busy, waiting");
            let _ = tokio::time::timeout(retry, notified).await;
        }
    }
}

/// Releases its apparatus slot when dropped.
#[derive(Debug)]
pub struct ApparatusGuard {
    apparatus: Arc<Apparatus>,
}

impl ApparatusGuard {
    /// Name of the held apparatus.
    #[must_use]
    pub fn name(&self) -> &str {
        self.apparatus.name()
    }
}

impl Drop for ApparatusGuard {
    fn drop(&mut self) {
        self.apparatus.release();
    }
}

/// The kitchen's apparatus inventory, keyed by name.
#[derive(Debug, Default)]
pub struct ApparatusPool {
    apparatuses: HashMap<String, Arc<Apparatus>>,
    retry: Duration,
}

impl ApparatusPool {
    /// Build the pool from the loaded inventory.
    #[must_use]
    pub fn new(specs: &[ApparatusSpec], retry: Duration) -> Self {
        let apparatuses = specs
            .iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    Arc::new(Apparatus::new(spec.name.clone(), spec.quantity)),
                )
            })
            .collect();
        Self { apparatuses, retry }
    }

    /// Look up an apparatus by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Apparatus>> {
        self.apparatuses.get(name)
    }

    /// Take a slot of `name` without waiting.
    ///
    /// Unknown names need no shared resource and always succeed.
    #[must_use]
    pub fn try_acquire(&self, name: &str) -> bool {
        self.get(name).is_none_or(|a| a.try_use())
    }

    /// Return a slot of `name` taken with [`Self::try_acquire`].
    pub fn release(&self, name: &str) {
        if let Some(apparatus) = self.get(name) {
            apparatus.release();
        }
    }

    /// Wait for a slot of `name` and hold it until the guard drops.
    ///
    /// Returns `None` when no apparatus with that name exists.
    pub async fn acquire(&self, name: &str) -> Option<ApparatusGuard> {
        let apparatus = Arc::clone(self.get(name)?);
        apparatus.acquire(self.retry).await;
        Some(ApparatusGuard { apparatus })
    }
}
