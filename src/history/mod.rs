//! Historical candles over arbitrarily long ranges.
//!
//! The exchange serves at most [`MAX_CANDLES_PER_REQUEST`] candles per call, so
//! a [`History`] walks a [`Timeline`] of windows and stitches the results into
//! one ascending, de-duplicated [`CandleStream`]. Windows are requested one at a
//! time, only when the previous window's candles have been consumed.

mod fetch;
mod granularity;
mod timeline;
mod wire;

pub use granularity::Granularity;
pub use timeline::{MAX_CANDLES_PER_REQUEST, Timeline, TimelineState, Window};

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use futures::Stream;

use crate::core::{Candle, CbpClient, CbpError, parse_instant};

/// A candle query for one product over `[start, end)`.
///
/// Construction validates the interval name and the dates, so configuration
/// mistakes surface before any request is made.
#[derive(Debug, Clone)]
pub struct History {
    client: CbpClient,
    timeline: Timeline,
}

impl History {
    /// # Errors
    /// [`CbpError::UnknownInterval`] if `interval` is not in the [`Granularity`]
    /// table, [`CbpError::InvalidDates`] if `end <= start`.
    pub fn new(
        client: &CbpClient,
        product_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Self, CbpError> {
        Ok(Self {
            client: client.clone(),
            timeline: Timeline::new(product_id, start, end, interval)?,
        })
    }

    pub fn with_granularity(
        client: &CbpClient,
        product_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Self, CbpError> {
        Ok(Self {
            client: client.clone(),
            timeline: Timeline::with_granularity(product_id, start, end, granularity)?,
        })
    }

    /// Like [`History::new`] but with dates as strings (`"2020-01-29"` or RFC 3339).
    pub fn from_strs(
        client: &CbpClient,
        product_id: impl Into<String>,
        start: &str,
        end: &str,
        interval: &str,
    ) -> Result<Self, CbpError> {
        let granularity = Granularity::from_name(interval)?;
        Self::with_granularity(
            client,
            product_id,
            parse_instant(start)?,
            parse_instant(end)?,
            granularity,
        )
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn requests_needed(&self) -> u64 {
        self.timeline.requests_needed()
    }

    /// Start a fresh lazy pass over the range. Nothing is fetched until the
    /// first pull.
    pub fn candles(&self) -> CandleStream {
        CandleStream {
            client: self.client.clone(),
            range_start: self.timeline.start(),
            range_end: self.timeline.end(),
            timeline: self.timeline.clone(),
            buffer: VecDeque::new(),
            last_time: None,
            windows_fetched: 0,
            done: false,
        }
    }
}

/// Forward-only candle sequence produced by [`History::candles`].
///
/// Holds at most one window of candles. After the range is exhausted or a
/// request fails, every further pull returns `Ok(None)`.
#[derive(Debug)]
pub struct CandleStream {
    client: CbpClient,
    timeline: Timeline,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    buffer: VecDeque<Candle>,
    last_time: Option<DateTime<Utc>>,
    windows_fetched: usize,
    done: bool,
}

impl CandleStream {
    /// Pull the next candle, fetching the next window if the current one is used up.
    ///
    /// # Errors
    /// Transport and decoding errors of the window being fetched. The stream
    /// is finished afterwards.
    pub async fn next(&mut self) -> Result<Option<Candle>, CbpError> {
        loop {
            if let Some(candle) = self.buffer.pop_front() {
                return Ok(Some(candle));
            }
            if self.done {
                return Ok(None);
            }
            let Some(window) = self.timeline.next() else {
                self.done = true;
                return Ok(None);
            };

            if self.windows_fetched > 0 {
                self.client.pace().await;
            }
            let fetched =
                match fetch::fetch_window(&self.client, self.timeline.product_id(), &window).await {
                    Ok(candles) => candles,
                    Err(e) => {
                        self.done = true;
                        return Err(e);
                    }
                };
            self.windows_fetched += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                product_id = self.timeline.product_id(),
                window_start = %window.start,
                window_end = %window.end,
                rows = fetched.len(),
                "fetched candle window"
            );

            self.accept(&window, fetched);
        }
    }

    /// Number of window requests issued so far.
    pub fn windows_fetched(&self) -> usize {
        self.windows_fetched
    }

    /// Collect the remaining candles.
    pub async fn collect_all(mut self) -> Result<Vec<Candle>, CbpError> {
        let mut out = Vec::new();
        while let Some(c) = self.next().await? {
            out.push(c);
        }
        Ok(out)
    }

    /// Adapt into a [`futures::Stream`]; the stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Candle, CbpError>> {
        futures::stream::try_unfold(self, |mut s| async move {
            Ok(s.next().await?.map(|c| (c, s)))
        })
    }

    /// Buffer the window's candles, dropping anything outside the window or the
    /// range, or not strictly newer than what was already yielded.
    fn accept(&mut self, window: &Window, candles: Vec<Candle>) {
        for candle in candles {
            if !window.contains(candle.time)
                || candle.time < self.range_start
                || candle.time >= self.range_end
            {
                continue;
            }
            if self.last_time.is_some_and(|last| candle.time <= last) {
                continue;
            }
            self.last_time = Some(candle.time);
            self.buffer.push_back(candle);
        }
    }
}
