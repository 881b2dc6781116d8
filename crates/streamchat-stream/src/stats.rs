//! Token and timing statistics shared between the stream pump and readers.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::segment::SegmentKind;

/// The single timed interval that may be open at any moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenInterval {
    None,
    Thinking(Instant),
    Response(Instant),
}

impl OpenInterval {
    fn kind(&self) -> Option<SegmentKind> {
        match self {
            OpenInterval::None => None,
            OpenInterval::Thinking(_) => Some(SegmentKind::Thinking),
            OpenInterval::Response(_) => Some(SegmentKind::Response),
        }
    }
}

#[derive(Debug)]
struct AccumulatorState {
    current_input_tokens: u64,
    current_output_tokens: u64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    thinking_duration: Duration,
    response_duration: Duration,
    open: OpenInterval,
}

impl AccumulatorState {
    fn new() -> Self {
        Self {
            current_input_tokens: 0,
            current_output_tokens: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            start_time: None,
            end_time: None,
            thinking_duration: Duration::ZERO,
            response_duration: Duration::ZERO,
            open: OpenInterval::None,
        }
    }

    fn close_open(&mut self, now: Instant) {
        match self.open {
            OpenInterval::None => {}
            OpenInterval::Thinking(start) => {
                self.thinking_duration += now.saturating_duration_since(start);
            }
            OpenInterval::Response(start) => {
                self.response_duration += now.saturating_duration_since(start);
            }
        }
        self.open = OpenInterval::None;
    }
}

/// Statistics of the current (or last finished) interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_time: Duration,
    pub response_time: Duration,
    /// Wall time from session start to session end; zero while streaming
    pub elapsed: Duration,
    /// Segment whose interval is still open, if any
    pub open_segment: Option<SegmentKind>,
}

impl StreamStats {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Sum of all closed thinking and response intervals
    pub fn segment_time(&self) -> Duration {
        self.thinking_time + self.response_time
    }

    pub fn has_segment_breakdown(&self) -> bool {
        !self.thinking_time.is_zero() || !self.response_time.is_zero()
    }
}

/// Token counts accumulated over the lifetime of a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TotalUsage {
    pub fn combined(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Thread-safe usage counters and segment timers.
///
/// Every operation takes the same lock and runs in constant time, so a
/// [`snapshot`](Self::snapshot) never observes a half-applied update.
#[derive(Debug)]
pub struct UsageAccumulator {
    state: Mutex<AccumulatorState>,
}

impl Default for UsageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AccumulatorState::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, AccumulatorState> {
        // Counters stay meaningful even if a holder panicked mid-update.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zero the per-interaction counters and timers and mark the session start.
    pub fn reset_interaction(&self, now: Instant) {
        let mut state = self.state();
        state.current_input_tokens = 0;
        state.current_output_tokens = 0;
        state.thinking_duration = Duration::ZERO;
        state.response_duration = Duration::ZERO;
        state.open = OpenInterval::None;
        state.start_time = Some(now);
        state.end_time = None;
    }

    /// Record a cumulative usage snapshot reported by the server.
    ///
    /// The current counters are overwritten; the lifetime totals grow by the
    /// difference to the previous snapshot of this interaction.
    pub fn record_usage(&self, input_tokens: u64, output_tokens: u64) {
        let mut state = self.state();
        let input_delta = input_tokens.saturating_sub(state.current_input_tokens);
        let output_delta = output_tokens.saturating_sub(state.current_output_tokens);
        state.total_input_tokens += input_delta;
        state.total_output_tokens += output_delta;
        state.current_input_tokens = input_tokens;
        state.current_output_tokens = output_tokens;
    }

    /// Open an interval of `kind`, closing the other kind first if it is open.
    /// Opening the kind that is already open keeps the original start.
    pub fn open_segment(&self, kind: SegmentKind, now: Instant) {
        let mut state = self.state();
        if state.open.kind() == Some(kind) {
            return;
        }
        state.close_open(now);
        state.open = match kind {
            SegmentKind::Thinking => OpenInterval::Thinking(now),
            SegmentKind::Response => OpenInterval::Response(now),
        };
    }

    /// Close the interval of `kind` if it is the open one.
    pub fn close_segment(&self, kind: SegmentKind, now: Instant) {
        let mut state = self.state();
        if state.open.kind() == Some(kind) {
            state.close_open(now);
        }
    }

    /// Close whatever interval is still open and mark the session end.
    pub fn finish(&self, now: Instant) {
        let mut state = self.state();
        state.close_open(now);
        state.end_time = Some(now);
    }

    pub fn snapshot(&self) -> StreamStats {
        let state = self.state();
        let elapsed = match (state.start_time, state.end_time) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        };
        StreamStats {
            input_tokens: state.current_input_tokens,
            output_tokens: state.current_output_tokens,
            thinking_time: state.thinking_duration,
            response_time: state.response_duration,
            elapsed,
            open_segment: state.open.kind(),
        }
    }

    pub fn totals(&self) -> TotalUsage {
        let state = self.state();
        TotalUsage {
            input_tokens: state.total_input_tokens,
            output_tokens: state.total_output_tokens,
        }
    }
}
