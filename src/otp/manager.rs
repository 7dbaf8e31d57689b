//! One-time password slots keyed by email.
//!
//! Each email owns at most one live code. All per-key operations run under
//! the map's shard lock for that key, so issue, verify and the expiry sweep
//! never observe a half-written slot.

use std::sync::{Arc, Weak};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use tokio::task::JoinHandle;

use super::clock::{Clock, SystemClock};

/// Codes are unusable after this long.
pub const DEFAULT_OTP_TTL: Duration = Duration::minutes(5);

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

#[derive(Debug, Clone)]
struct OtpRecord {
    code: String,
    expires_at: DateTime<Utc>,
}

impl OtpRecord {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct OtpManager {
    records: DashMap<String, OtpRecord>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl OtpManager {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a fresh 6-digit code for `email`, replacing any earlier one.
    pub fn issue(&self, email: &str) -> String {
        let code = rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string();
        let record = OtpRecord {
            code: code.clone(),
            expires_at: self.clock.now() + self.ttl,
        };
        self.records.insert(email.to_string(), record);
        code
    }

    /// `true` only for the live code of `email`; a match consumes the slot.
    ///
    /// A wrong code leaves the slot untouched so the caller may retry until
    /// expiry. An expired slot is dropped on the way out.
    pub fn verify(&self, email: &str, code: &str) -> bool {
        let now = self.clock.now();
        if self
            .records
            .remove_if(email, |_, record| record.is_live(now) && record.code == code)
            .is_some()
        {
            return true;
        }
        self.records
            .remove_if(email, |_, record| !record.is_live(now));
        false
    }

    /// Drop every expired slot. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = record.is_live(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of stored slots, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Periodically purge expired slots. The task ends once the manager is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: StdDuration) -> JoinHandle<()> {
        let manager: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let removed = manager.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, remaining = manager.len(), "expired OTPs purged");
                }
            }
        })
    }
}
