use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub date: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self> {
        let date = DateTime::<Utc>::from_timestamp_millis(open_time)
            .ok_or_else(|| Error::new(format!("open time out of range: {open_time}")))?;
        Ok(Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            date,
        })
    }
}

/// Candles ordered by strictly increasing open time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candles(candles: Vec<Candle>) -> Result<Self> {
        if let Some(pair) = candles
            .windows(2)
            .find(|pair| pair[0].open_time >= pair[1].open_time)
        {
            return Err(Error::new(format!(
                "candles out of order: {} followed by {}",
                pair[0].open_time, pair[1].open_time
            )));
        }
        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn first_open_time(&self) -> Option<i64> {
        self.first().map(|candle| candle.open_time)
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn into_vec(self) -> Vec<Candle> {
        self.candles
    }

    /// Puts an older page in front of the held candles. Rows of `earlier` that are
    /// not strictly older than the current first candle are dropped; returns how many.
    pub fn prepend(&mut self, earlier: CandleSeries) -> usize {
        let mut rows = earlier.candles;
        let before = rows.len();
        if let Some(boundary) = self.first_open_time() {
            rows.retain(|candle| candle.open_time < boundary);
        }
        let dropped = before - rows.len();
        rows.append(&mut self.candles);
        self.candles = rows;
        dropped
    }
}

impl IntoIterator for CandleSeries {
    type Item = Candle;
    type IntoIter = std::vec::IntoIter<Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
