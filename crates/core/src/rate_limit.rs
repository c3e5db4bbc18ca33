//! Per-IP admission control for the submission endpoint.
//!
//! Each client IP gets a fixed window that opens on its first request. Up to
//! `max_requests` requests are admitted inside the window; the rest are
//! blocked until the window expires. Blocked requests do not extend or
//! consume the window.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Default number of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Table size above which expired windows are swept, at most once per window.
const CLEANUP_THRESHOLD: usize = 10_000;

/// Limits applied by a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed; `remaining` more fit in the current window.
    Accepted { remaining: u32 },
    /// The client has used up its window.
    Blocked,
}

impl Admission {
    pub fn is_blocked(self) -> bool {
        matches!(self, Admission::Blocked)
    }
}

/// Shared per-IP request counter.
///
/// Cloning is cheap and every clone sees the same counters. Updates go
/// through the `DashMap` entry API, so concurrent checks for one IP never
/// lose an increment.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// IP -> (admitted count, window start).
    state: Arc<DashMap<IpAddr, (u32, Instant)>>,
    config: RateLimitConfig,
    /// Reference point for `last_sweep`.
    epoch: Instant,
    /// Nanoseconds after `epoch` at which the last automatic sweep ran.
    last_sweep: Arc<AtomicU64>,
    sweep_threshold: usize,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_sweep_threshold(config, CLEANUP_THRESHOLD)
    }

    fn with_sweep_threshold(config: RateLimitConfig, sweep_threshold: usize) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            config,
            epoch: Instant::now(),
            last_sweep: Arc::new(AtomicU64::new(0)),
            sweep_threshold,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Check and record a request from `ip` at the current time.
    pub fn check(&self, ip: IpAddr) -> Admission {
        self.check_at(ip, Instant::now())
    }

    /// Check and record a request from `ip` as if it arrived at `now`.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> Admission {
        let admission = {
            let mut entry = self.state.entry(ip).or_insert((0, now));
            let (count, window_start) = entry.value_mut();

            if now.saturating_duration_since(*window_start) >= self.config.window {
                *count = 0;
                *window_start = now;
            }

            if *count >= self.config.max_requests {
                Admission::Blocked
            } else {
                *count += 1;
                Admission::Accepted {
                    remaining: self.config.max_requests - *count,
                }
            }
        };

        // Sweep outside the entry guard so the shard lock is released.
        if self.state.len() > self.sweep_threshold {
            self.maybe_sweep(now);
        }

        admission
    }

    /// Sweep unless another sweep ran less than one window ago. Of several
    /// concurrent callers only the one that wins the exchange sweeps.
    fn maybe_sweep(&self, now: Instant) {
        let at = nanos_u64(now.saturating_duration_since(self.epoch));
        let last = self.last_sweep.load(Ordering::Relaxed);
        if at.saturating_sub(last) < nanos_u64(self.config.window) {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, at, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            self.sweep(now);
        }
    }

    /// Number of IPs currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.state.len()
    }

    /// Drop every window that has expired as of `now`.
    pub fn sweep(&self, now: Instant) {
        let window = self.config.window;
        self.state
            .retain(|_ip, (_count, start)| now.saturating_duration_since(*start) < window);
    }
}

fn nanos_u64(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
