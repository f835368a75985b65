use chrono::DateTime;
use serde::Deserialize;

use crate::core::{Candle, CbpError};

/// One row of `/products/{id}/candles`: `[time, low, high, open, close, volume]`.
#[derive(Debug, Deserialize)]
pub(crate) struct CandleRow(
    pub(crate) i64,
    pub(crate) f64,
    pub(crate) f64,
    pub(crate) f64,
    pub(crate) f64,
    pub(crate) f64,
);

impl TryFrom<CandleRow> for Candle {
    type Error = CbpError;

    fn try_from(CandleRow(time, low, high, open, close, volume): CandleRow) -> Result<Self, CbpError> {
        let time = DateTime::from_timestamp(time, 0)
            .ok_or_else(|| CbpError::Data(format!("candle time out of range: {time}")))?;
        Ok(Candle {
            time,
            low,
            high,
            open,
            close,
            volume,
        })
    }
}
