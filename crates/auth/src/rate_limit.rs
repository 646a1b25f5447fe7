use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: i64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Entries {
    windows: HashMap<String, Window>,
    last_sweep: Option<DateTime<Utc>>,
}

impl Entries {
    fn sweep(&mut self, now: DateTime<Utc>) {
        self.windows.retain(|_, w| w.resets_at > now);
        self.last_sweep = Some(now);
    }
}

/// Fixed-window attempt counter keyed by identifier (login email).
///
/// Expired windows are swept from inside [`check`](Self::check), at most once
/// per window length.
#[derive(Debug)]
pub struct LoginRateLimiter {
    max_attempts: u32,
    window: Duration,
    entries: Mutex<Entries>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::minutes(DEFAULT_WINDOW_MINUTES))
    }
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Record one attempt and decide whether it may proceed.
    pub fn check(&self, identifier: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let key = identifier.trim().to_lowercase();
        let mut entries = self.lock();
        if entries.last_sweep.is_none_or(|at| now - at >= self.window) {
            entries.sweep(now);
        }

        if let Some(w) = entries.windows.get_mut(&key).filter(|w| w.resets_at > now) {
            if w.count >= self.max_attempts {
                let millis = (w.resets_at - now).num_milliseconds();
                return RateLimitDecision::Limited {
                    retry_after_secs: (millis + 999) / 1000,
                };
            }
            w.count += 1;
            return RateLimitDecision::Allowed {
                remaining: self.max_attempts - w.count,
            };
        }

        entries.windows.insert(
            key,
            Window {
                count: 1,
                resets_at: now + self.window,
            },
        );
        RateLimitDecision::Allowed {
            remaining: self.max_attempts.saturating_sub(1),
        }
    }

    /// Identifiers currently holding a window.
    pub fn tracked(&self) -> usize {
        self.lock().windows.len()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn sixth_attempt_in_window_is_limited() {
        let rl = LoginRateLimiter::default();
        for expected in (0..5).rev() {
            assert_eq!(
                rl.check("rita@shop.test", t0()),
                RateLimitDecision::Allowed { remaining: expected }
            );
        }
        assert_eq!(
            rl.check("rita@shop.test", t0() + Duration::minutes(5)),
            RateLimitDecision::Limited {
                retry_after_secs: 600
            }
        );
    }

    #[test]
    fn window_resets_after_expiry() {
        let rl = LoginRateLimiter::new(1, Duration::minutes(15));
        assert!(rl.check("a", t0()).is_allowed());
        assert!(!rl.check("a", t0() + Duration::minutes(1)).is_allowed());
        assert!(rl.check("a", t0() + Duration::minutes(15)).is_allowed());
    }

    #[test]
    fn identifiers_are_independent_and_case_insensitive() {
        let rl = LoginRateLimiter::new(1, Duration::minutes(15));
        assert!(rl.check("A@x.test", t0()).is_allowed());
        assert!(!rl.check("a@x.test", t0()).is_allowed());
        assert!(rl.check("b@x.test", t0()).is_allowed());
    }

    #[test]
    fn checks_sweep_expired_windows() {
        let rl = LoginRateLimiter::new(5, Duration::minutes(15));
        for i in 0..100 {
            rl.check(&format!("user{i}@shop.test"), t0());
        }
        assert_eq!(rl.tracked(), 100);

        // Still inside the first window: nothing has expired yet.
        rl.check("late@shop.test", t0() + Duration::minutes(10));
        assert_eq!(rl.tracked(), 101);

        rl.check("next@shop.test", t0() + Duration::minutes(16));
        assert_eq!(rl.tracked(), 2);
    }
}
