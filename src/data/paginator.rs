use crate::models::{CandleSeries, Interval};
use crate::Result;
use tracing::{debug, warn};

/// Anything that can serve a single page of klines.
pub trait KlineSource {
    /// Largest `limit` one page may ask for.
    fn page_cap(&self) -> u32;

    fn fetch_page(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
        end_time: Option<i64>,
    ) -> Result<CandleSeries>;
}

/// Page sizes in fetch order: the most recent (possibly partial) page first,
/// then full pages walking back in time. Yielded lazily.
pub fn page_plan(limit: u32, cap: u32) -> impl Iterator<Item = u32> {
    let (rounds, initial) = match (limit.checked_div(cap), limit.checked_rem(cap)) {
        (Some(full), Some(0)) => (full, cap),
        (Some(full), Some(rest)) => (full + 1, rest),
        _ => (0, cap),
    };
    std::iter::once(initial)
        .chain(std::iter::repeat(cap))
        .take(rounds as usize)
}

/// Returns the `limit` candles ending at `end_time` (or now), issuing as many
/// page requests as the source's cap requires. Any failed page fails the call.
pub fn fetch_many<S: KlineSource + ?Sized>(
    source: &S,
    symbol: &str,
    interval: Interval,
    limit: u32,
    end_time: Option<i64>,
) -> Result<CandleSeries> {
    let mut pages = page_plan(limit, source.page_cap());
    let Some(initial) = pages.next() else {
        return Ok(CandleSeries::new());
    };

    let mut series = source.fetch_page(symbol, interval, initial, end_time)?;
    for (round, page_limit) in pages.enumerate() {
        let Some(earliest) = series.first_open_time() else {
            debug!(symbol, %interval, round, "no history to page back from");
            break;
        };
        let page = source.fetch_page(symbol, interval, page_limit, Some(earliest - 1))?;
        let dropped = series.prepend(page);
        if dropped > 0 {
            warn!(symbol, %interval, dropped, "dropped overlapping kline rows");
        }
    }
    debug!(symbol, %interval, limit, rows = series.len(), "assembled kline series");
    Ok(series)
}
