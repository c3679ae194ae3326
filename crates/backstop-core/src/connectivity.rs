//! Process-wide connectivity state: cached online/offline flag, transition
//! listeners, and an optional active probe.
//!
//! One monitor is constructed at startup and handed (via `Arc`) to every
//! consumer; there is no global instance. The cached flag starts online and is
//! updated either by the host's network-change signal (`set_online`) or by an
//! active probe (`check_now`).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::probe;

type Listener = dyn Fn(bool) + Send + Sync;

/// Handle returned by [`ConnectivityMonitor::subscribe`]; pass back to
/// [`ConnectivityMonitor::unsubscribe`] to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared online/offline source of truth.
pub struct ConnectivityMonitor {
    online: AtomicBool,
    next_id: AtomicU64,
    /// Listeners in subscription order.
    listeners: Mutex<Vec<(u64, Arc<Listener>)>>,
    probe_url: Option<String>,
    probe_timeout: Duration,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityMonitor {
    /// Monitor without an active probe; state changes only via `set_online`.
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
            probe_url: None,
            probe_timeout: Duration::from_secs(10),
        }
    }

    /// Monitor whose `check_now` probes `url` with the given timeout.
    pub fn with_probe(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            probe_url: Some(url.into()),
            probe_timeout: timeout,
            ..Self::new()
        }
    }

    /// Current cached state.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Register a listener invoked on every state transition with the new
    /// state. Safe to call from within another listener.
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().unwrap().push((id, Arc::new(listener)));
        SubscriptionId(id)
    }

    /// Remove a listener. Safe to call from within a listener, including the
    /// one being removed; a listener unsubscribed mid-notification is skipped
    /// for the remainder of that notification.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().unwrap().retain(|(lid, _)| *lid != id.0);
    }

    /// Feed a host-provided online/offline signal into the monitor.
    /// Listeners fire only when the state actually changes.
    pub fn set_online(&self, online: bool) {
        let prev = self.online.swap(online, Ordering::SeqCst);
        if prev == online {
            return;
        }
        tracing::info!(online, "connectivity changed");
        self.notify(online);
    }

    fn notify(&self, online: bool) {
        // Snapshot so listeners can subscribe/unsubscribe without holding the
        // lock across their own callback; each entry is re-checked against the
        // live set so removal during notification is honored.
        let snapshot: Vec<(u64, Arc<Listener>)> = {
            let listeners = self.listeners.lock().unwrap();
            listeners.iter().map(|(id, l)| (*id, Arc::clone(l))).collect()
        };
        for (id, listener) in snapshot {
            let still_registered = self
                .listeners
                .lock()
                .unwrap()
                .iter()
                .any(|(lid, _)| *lid == id);
            if !still_registered {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| listener(online))).is_err() {
                tracing::warn!(listener_id = id, "connectivity listener panicked");
            }
        }
    }

    /// Actively probe the configured endpoint, update the cached state, and
    /// return it. Requires a probe URL; use when passive signals are missing
    /// or suspected stale.
    pub async fn check_now(&self) -> Result<bool> {
        let url = self
            .probe_url
            .clone()
            .context("no connectivity probe URL configured")?;
        let timeout = self.probe_timeout;
        let online = tokio::task::spawn_blocking(move || probe::reachable(&url, timeout))
            .await
            .context("connectivity probe task failed")?
            .context("connectivity probe misconfigured")?;
        self.set_online(online);
        Ok(online)
    }
}
