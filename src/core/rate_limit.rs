//! Per-client sliding-window rate limiting

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use dashmap::DashMap;
use crate::config::ChatConfig;
use crate::RATE_LIMIT_WINDOW_SECS;

/// Allows at most `max_requests` per client inside `window`
#[derive(Debug)]
pub struct RateLimiter {
    enabled: bool,
    max_requests: usize,
    window: Duration,
    clients: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            enabled: true,
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    /// Limiter that allows everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0, Duration::ZERO)
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        if config.rate_limit_enabled {
            Self::new(
                config.max_requests_per_minute,
                Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
            )
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a request for `client` and report whether it is allowed
    pub fn check(&self, client: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let mut log = self.clients.entry(client.to_string()).or_default();
        prune(&mut log, now, self.window);

        if log.len() >= self.max_requests {
            return false;
        }
        log.push_back(now);
        true
    }

    /// Forget clients with no requests left in the window; returns how many
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut dropped = 0;
        self.clients.retain(|_, log| {
            prune(log, now, self.window);
            let keep = !log.is_empty();
            if !keep {
                dropped += 1;
            }
            keep
        });
        dropped
    }
}

/// Drop timestamps that fell out of the window
fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(front) = log.front() {
        if now.duration_since(*front) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}
