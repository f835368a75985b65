//! Splitting a long candle range into request-sized windows.
//!
//! The range is half-open: a bucket starting at `t` belongs to it when
//! `start <= t < end`. Windows sit on the granularity grid, beginning with the
//! bucket that contains `start`. Each window is a closed bucket range of at most
//! [`MAX_CANDLES_PER_REQUEST`] buckets; the next window starts one bucket after
//! the previous window's end, so every bucket is requested exactly once.

use chrono::{DateTime, Utc};

use crate::core::CbpError;

use super::granularity::Granularity;

/// Most candles the exchange returns for a single request.
pub const MAX_CANDLES_PER_REQUEST: i32 = 300;

/// One request's worth of candles: buckets `t` with `start <= t <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

impl Window {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Where a [`Timeline`] is in its walk over the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    NotStarted,
    InProgress { previous_end: DateTime<Utc> },
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    product_id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
    // grid-aligned `start`; windows are laid out from here
    first_bucket: DateTime<Utc>,
    state: TimelineState,
}

impl Timeline {
    /// Build a timeline from an interval name such as `"daily"`.
    ///
    /// # Errors
    /// [`CbpError::UnknownInterval`] for an unknown name, [`CbpError::InvalidDates`]
    /// if `end <= start`.
    pub fn new(
        product_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Self, CbpError> {
        let granularity = Granularity::from_name(interval)?;
        Self::with_granularity(product_id, start, end, granularity)
    }

    pub fn with_granularity(
        product_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Self, CbpError> {
        if end <= start {
            return Err(CbpError::InvalidDates);
        }
        Ok(Self {
            product_id: product_id.into(),
            start,
            end,
            granularity,
            first_bucket: granularity.floor(start),
            state: TimelineState::NotStarted,
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Number of windows needed to cover the range, `ceil(span / (granularity * cap))`.
    ///
    /// The span is measured from the bucket containing `start`, which is the
    /// same as `start` when it lies on the grid.
    pub fn requests_needed(&self) -> u64 {
        let span_ms = (self.end - self.first_bucket).num_milliseconds().unsigned_abs();
        let window_ms = self.granularity.duration().num_milliseconds().unsigned_abs()
            * MAX_CANDLES_PER_REQUEST.unsigned_abs() as u64;
        span_ms.div_ceil(window_ms)
    }

    /// The window that follows `previous_end`, or the first window for `None`.
    ///
    /// Returns `None` once the window would start at or past the range end.
    pub fn next_window(&self, previous_end: Option<DateTime<Utc>>) -> Option<Window> {
        let step = self.granularity.duration();
        let start = match previous_end {
            None => self.first_bucket,
            Some(prev) => prev + step,
        };
        if start >= self.end {
            return None;
        }
        let end = (start + step * (MAX_CANDLES_PER_REQUEST - 1)).min(self.end);
        Some(Window {
            start,
            end,
            granularity: self.granularity,
        })
    }
}

impl Iterator for Timeline {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let window = match self.state {
            TimelineState::Exhausted => return None,
            TimelineState::NotStarted => self.next_window(None),
            TimelineState::InProgress { previous_end } => self.next_window(Some(previous_end)),
        };
        self.state = match window {
            Some(w) => TimelineState::InProgress { previous_end: w.end },
            None => TimelineState::Exhausted,
        };
        window
    }
}
