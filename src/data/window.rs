use crate::models::Interval;
use crate::{Error, Result};

/// Fetch parameters covering the `subinterval` candles inside one `interval` candle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubWindow {
    pub limit: u32,
    pub end_time: Option<i64>,
    /// Open time of the last sub-candle the large candle will contain.
    pub last_sub_open: i64,
    pub closed: bool,
}

impl SubWindow {
    /// End time pinned to this large candle. `end_time` alone only selects the
    /// right rows when the large candle is the most recent one.
    pub fn anchored_end_time(&self) -> Option<i64> {
        if self.closed {
            Some(self.last_sub_open)
        } else {
            self.end_time
        }
    }
}

pub fn window(
    interval: Interval,
    subinterval: Interval,
    start_time: i64,
    now_ms: i64,
) -> Result<SubWindow> {
    if subinterval.duration_secs() > interval.duration_secs() {
        return Err(Error::invalid_input(format!(
            "subinterval {subinterval} is longer than interval {interval}"
        )));
    }
    let full = interval.duration_secs() / subinterval.duration_secs();
    let last_sub_open = start_time
        .checked_add(interval.duration_ms())
        .ok_or_else(|| Error::invalid_input(format!("start time {start_time} out of range")))?
        - subinterval.duration_ms();

    if last_sub_open <= now_ms {
        return Ok(SubWindow {
            limit: full as u32,
            end_time: None,
            last_sub_open,
            closed: true,
        });
    }

    // Sub-candles still to open, plus one for the one currently forming.
    let remaining = last_sub_open.saturating_sub(now_ms) / subinterval.reference_ms() + 1;
    Ok(SubWindow {
        limit: (full - remaining).max(0) as u32,
        end_time: None,
        last_sub_open,
        closed: false,
    })
}
