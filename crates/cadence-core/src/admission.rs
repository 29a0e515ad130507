//! Admission control
//!
//! Decides whether an automated action may run now, later, or not at all
//! today. Two limits apply:
//! - a daily cap on committed actions, reset on calendar-day transitions
//! - a randomized minimum gap between consecutive committed actions
//!
//! The controller is a plain `&mut self` state machine. Callers that share it
//! across tasks wrap it in [`SharedAdmission`] and hold the lock across the
//! whole evaluate → execute → commit cycle.

use crate::jitter::JitterSampler;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Controller shared behind the single admission lock
pub type SharedAdmission<R = StdRng> = Arc<Mutex<AdmissionController<R>>>;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Daily quota configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    /// Maximum committed actions per calendar day
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
    /// Offset from UTC, in minutes, of the calendar used for day boundaries
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_daily_cap() -> u32 {
    20
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            utc_offset_minutes: 0,
        }
    }
}

impl QuotaPolicy {
    /// Policy with the given cap on the UTC calendar
    #[must_use]
    pub fn new(daily_cap: u32) -> Self {
        Self {
            daily_cap,
            utc_offset_minutes: 0,
        }
    }

    /// Returns an error message if the offset is out of range
    pub fn validate(&self) -> Result<(), String> {
        if self.utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            return Err(format!(
                "utc_offset_minutes ({}) must be within one day",
                self.utc_offset_minutes
            ));
        }
        Ok(())
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Calendar day that `now` falls on
    #[must_use]
    pub fn day_of(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset()).date_naive()
    }

    /// Start of the calendar day after the one `now` falls on
    #[must_use]
    pub fn next_day_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = self.day_of(now).succ_opt()?.and_hms_opt(0, 0, 0)?;
        self.offset()
            .from_local_datetime(&midnight)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Bounds for the required spacing between committed actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayPolicy {
    /// Minimum gap in milliseconds
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,
    /// Maximum gap in milliseconds
    #[serde(default = "default_max_gap_ms")]
    pub max_gap_ms: u64,
}

fn default_min_gap_ms() -> u64 {
    15 * 60 * 1000
}
fn default_max_gap_ms() -> u64 {
    60 * 60 * 1000
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            min_gap_ms: default_min_gap_ms(),
            max_gap_ms: default_max_gap_ms(),
        }
    }
}

impl DelayPolicy {
    /// Create a delay policy
    #[must_use]
    pub const fn new(min_gap_ms: u64, max_gap_ms: u64) -> Self {
        Self {
            min_gap_ms,
            max_gap_ms,
        }
    }

    /// Returns an error message if the bounds are inverted
    pub fn validate(&self) -> Result<(), String> {
        if self.min_gap_ms > self.max_gap_ms {
            return Err(format!(
                "min_gap_ms ({}) must not exceed max_gap_ms ({})",
                self.min_gap_ms, self.max_gap_ms
            ));
        }
        Ok(())
    }
}

/// Quota and spacing counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdmissionState {
    /// Calendar day the counters apply to (unset before first use)
    pub day_key: Option<NaiveDate>,
    /// Actions committed on `day_key`
    pub daily_count: u32,
    /// Time of the last committed action
    pub last_action_at: Option<DateTime<Utc>>,
}

/// Why an action was refused for the rest of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The daily cap has been reached
    DailyLimitExceeded,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyLimitExceeded => write!(f, "daily limit exceeded"),
        }
    }
}

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AdmissionDecision {
    /// Proceed now
    Allowed,
    /// Retry no earlier than `wait_ms` from now
    Deferred {
        /// Milliseconds to wait
        wait_ms: u64,
    },
    /// Stop until the next calendar day
    Denied {
        /// Reason for the refusal
        reason: DenyReason,
    },
}

impl AdmissionDecision {
    /// Whether the action may proceed
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Read-only view of the controller for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionSnapshot {
    /// Time the snapshot was taken
    pub taken_at: DateTime<Utc>,
    /// Calendar day the counters apply to
    pub day: NaiveDate,
    /// Actions committed today
    pub daily_count: u32,
    /// Configured daily cap
    pub daily_cap: u32,
    /// Actions still available today
    pub remaining: u32,
    /// Time of the last committed action
    pub last_action_at: Option<DateTime<Utc>>,
    /// When the daily counter next resets
    pub resets_at: Option<DateTime<Utc>>,
    /// Lower spacing bound
    pub min_gap_ms: u64,
    /// Upper spacing bound
    pub max_gap_ms: u64,
}

/// Owner of the admission state
#[derive(Debug)]
pub struct AdmissionController<R = StdRng> {
    quota: QuotaPolicy,
    delay: DelayPolicy,
    state: AdmissionState,
    sampler: JitterSampler<R>,
}

impl<R: Rng> AdmissionController<R> {
    /// Create a controller with empty counters
    #[must_use]
    pub fn new(quota: QuotaPolicy, delay: DelayPolicy, sampler: JitterSampler<R>) -> Self {
        Self {
            quota,
            delay,
            state: AdmissionState::default(),
            sampler,
        }
    }

    /// Wrap the controller in the shared lock
    #[must_use]
    pub fn into_shared(self) -> SharedAdmission<R> {
        Arc::new(Mutex::new(self))
    }

    /// Current counters
    #[must_use]
    pub fn state(&self) -> &AdmissionState {
        &self.state
    }

    /// Quota configuration
    #[must_use]
    pub fn quota(&self) -> &QuotaPolicy {
        &self.quota
    }

    /// Spacing configuration
    #[must_use]
    pub fn delay(&self) -> &DelayPolicy {
        &self.delay
    }

    /// Decide whether an action may run at `now`.
    ///
    /// Resets the daily counter when `now` falls on a later calendar day than
    /// the stored one. Never increments the counter. The required gap is
    /// drawn fresh on every call, so consecutive deferrals may report wait
    /// times that do not decrease monotonically.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> AdmissionDecision {
        self.roll_day(now);

        if self.state.daily_count >= self.quota.daily_cap {
            debug!(
                daily_count = self.state.daily_count,
                daily_cap = self.quota.daily_cap,
                "Daily limit reached"
            );
            return AdmissionDecision::Denied {
                reason: DenyReason::DailyLimitExceeded,
            };
        }

        let Some(last) = self.state.last_action_at else {
            return AdmissionDecision::Allowed;
        };

        let required_gap = self
            .sampler
            .sample(self.delay.min_gap_ms, self.delay.max_gap_ms);
        // A clock that moved backwards counts as no time elapsed
        let elapsed = u64::try_from((now - last).num_milliseconds()).unwrap_or(0);

        if elapsed < required_gap {
            let wait_ms = required_gap - elapsed;
            debug!(elapsed_ms = elapsed, required_gap_ms = required_gap, wait_ms, "Deferring action");
            AdmissionDecision::Deferred { wait_ms }
        } else {
            AdmissionDecision::Allowed
        }
    }

    /// Record an action that has externally succeeded.
    ///
    /// Applies unconditionally; only call after an `Allowed` evaluation whose
    /// action completed.
    pub fn commit(&mut self, now: DateTime<Utc>) {
        if self.state.day_key.is_none() {
            self.state.day_key = Some(self.quota.day_of(now));
        }
        self.state.daily_count = self.state.daily_count.saturating_add(1);
        self.state.last_action_at = Some(now);
        debug!(daily_count = self.state.daily_count, "Action committed");
    }

    /// Status view at `now` without mutating state
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> AdmissionSnapshot {
        let today = self.quota.day_of(now);
        let (day, daily_count) = match self.state.day_key {
            Some(key) if today <= key => (key, self.state.daily_count),
            _ => (today, 0),
        };
        AdmissionSnapshot {
            taken_at: now,
            day,
            daily_count,
            daily_cap: self.quota.daily_cap,
            remaining: self.quota.daily_cap.saturating_sub(daily_count),
            last_action_at: self.state.last_action_at,
            resets_at: self.quota.next_day_start(now),
            min_gap_ms: self.delay.min_gap_ms,
            max_gap_ms: self.delay.max_gap_ms,
        }
    }

    // Only moves forward: a clock that steps back across midnight keeps
    // counting against the stored day.
    fn roll_day(&mut self, now: DateTime<Utc>) {
        let today = self.quota.day_of(now);
        match self.state.day_key {
            Some(key) if today <= key => {
                if today < key {
                    debug!(stored = %key, %today, "Clock behind stored day, keeping quota");
                }
            }
            previous => {
                if let Some(previous) = previous {
                    debug!(%previous, %today, "Calendar day changed, resetting quota");
                }
                self.state.day_key = Some(today);
                self.state.daily_count = 0;
            }
        }
    }
}
