//! Time control and search limits for draughts engines.
//!
//! The search polls the clock cooperatively at every recursion entry, so the
//! deadline is soft: it may be overshot by the cost of one recursive call.
//! The clock is passed explicitly through the search instead of living in a
//! global, which keeps concurrent searches for different games independent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Search limits that control when an engine should stop searching.
///
/// Engines search to `depth` plies and then extend forced capture lines by at
/// most `quiescence_depth` plies. The time limit takes precedence: once it is
/// spent the engine returns the best move it has fully evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Nominal search depth in plies
    pub depth: u8,
    /// Extra plies allowed for capture-only extension past the horizon
    pub quiescence_depth: u8,
    /// Maximum time allowed for this move (None = infinite)
    #[serde(with = "millis")]
    pub move_time: Option<Duration>,
    /// Time controller for checking if search should stop
    #[serde(skip)]
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Create limits with only a depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            quiescence_depth: DEFAULT_QUIESCENCE_DEPTH,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            quiescence_depth: DEFAULT_QUIESCENCE_DEPTH,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    pub fn with_quiescence_depth(mut self, quiescence_depth: u8) -> Self {
        self.quiescence_depth = quiescence_depth;
        self
    }

    /// Fresh limits with the same settings and an unstarted clock.
    ///
    /// Limits deserialized from config carry no controller for `move_time`
    /// yet; this builds one.
    pub fn fresh(&self) -> Self {
        Self {
            depth: self.depth,
            quiescence_depth: self.quiescence_depth,
            move_time: self.move_time,
            time_control: TimeControl::new(self.move_time),
        }
    }

    /// Check if search should stop due to time limit.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    /// Start the time control clock. Call this when search begins.
    pub fn start(&self) {
        self.time_control.start();
    }
}

pub const DEFAULT_DEPTH: u8 = 4;
pub const DEFAULT_QUIESCENCE_DEPTH: u8 = 3;
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_millis(1500);

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth_and_time(DEFAULT_DEPTH, DEFAULT_MOVE_TIME)
    }
}

/// Thread-safe time controller that tracks whether search should stop.
///
/// Cheap to clone; clones share the stop flag and start instant.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    /// Start time of the search
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
}

impl TimeControl {
    /// Create a new time controller.
    ///
    /// # Arguments
    /// * `time_limit` - Maximum time allowed for search (None = infinite)
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
        }
    }

    /// Start the clock. Should be called when search begins.
    pub fn start(&self) {
        let mut start = self.start_time.write().unwrap_or_else(|e| e.into_inner());
        *start = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Force stop the search immediately.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// This is a fast atomic load, suitable for calling frequently.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Check time and update stopped flag if time expired.
    ///
    /// Returns true once the search must stop. A clock that was never
    /// started never expires.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit {
            if self.started_at().is_some_and(|start| start.elapsed() >= limit) {
                self.stop();
                return true;
            }
        }

        false
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.started_at()
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn started_at(&self) -> Option<Instant> {
        *self.start_time.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

/// `Option<Duration>` as optional whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
