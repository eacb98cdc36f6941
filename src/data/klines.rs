use crate::exchange::endpoints;
use crate::exchange::params::Params;
use crate::exchange::parse::{value_to_f64, value_to_i64};
use crate::exchange::transport::{exchange_error, Transport};
use crate::models::{Candle, CandleSeries, Interval};
use crate::{Error, Result};
use serde_json::Value;
use tracing::debug;

/// Most rows the futures klines endpoint returns for one request.
pub const MAX_KLINES_PER_REQUEST: u32 = 1500;

/// Fields in each kline row before the ones we drop (close time, quote volume,
/// trade count, taker volumes, unused).
const KLINE_FIELDS: usize = 6;

/// Fetches one page of at most `limit` candles whose open time is at or before
/// `end_time`, or the latest ones when `end_time` is absent.
pub fn fetch_klines<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    symbol: &str,
    interval: Interval,
    limit: u32,
    end_time: Option<i64>,
) -> Result<CandleSeries> {
    let mut params = Params::new()
        .with("symbol", symbol)
        .with("interval", interval)
        .with("limit", limit);
    params.push_opt("endTime", end_time);

    let url = format!("{base_url}{}", endpoints::KLINES);
    let json = transport.get(&url, &params, &[])?;
    let series = parse_klines(&json)?;
    debug!(
        symbol,
        %interval,
        limit,
        end_time,
        rows = series.len(),
        "fetched kline page"
    );
    Ok(series)
}

pub fn parse_klines(value: &Value) -> Result<CandleSeries> {
    if let Some(err) = exchange_error(value) {
        return Err(err);
    }
    let rows = value
        .as_array()
        .ok_or_else(|| Error::malformed("klines response should be array", value.to_string()))?;

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        let candle =
            parse_row(row).map_err(|err| Error::malformed(err.message, value.to_string()))?;
        candles.push(candle);
    }
    CandleSeries::from_candles(candles)
        .map_err(|err| Error::malformed(err.message, value.to_string()))
}

fn parse_row(row: &Value) -> Result<Candle> {
    let row = row
        .as_array()
        .ok_or_else(|| Error::new("kline row is not array"))?;
    if row.len() < KLINE_FIELDS {
        return Err(Error::new("kline row has insufficient fields"));
    }
    Candle::new(
        value_to_i64(&row[0])?,
        value_to_f64(&row[1])?,
        value_to_f64(&row[2])?,
        value_to_f64(&row[3])?,
        value_to_f64(&row[4])?,
        value_to_f64(&row[5])?,
    )
}
