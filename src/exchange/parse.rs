use crate::models::{
    AccountInfo, AssetBalance, OrderInfo, PositionRisk, SymbolInfo, SymbolsOverview, Ticker24h,
};
use crate::{Error, Result};
use serde_json::Value;

pub(crate) fn value_to_i64(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| Error::new("number is not i64")),
        Value::String(text) => text
            .parse::<i64>()
            .map_err(|err| Error::new(format!("invalid i64: {err}"))),
        _ => Err(Error::new("unexpected value type for i64")),
    }
}

pub(crate) fn value_to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::new("number is not f64")),
        Value::String(text) => text
            .parse::<f64>()
            .map_err(|err| Error::new(format!("invalid f64: {err}"))),
        _ => Err(Error::new("unexpected value type for f64")),
    }
}

fn field<'a>(object: &'a Value, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| Error::malformed(format!("{key} missing"), object.to_string()))
}

fn str_field(object: &Value, key: &str) -> Result<String> {
    field(object, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(format!("{key} is not a string"), object.to_string()))
}

fn f64_field(object: &Value, key: &str) -> Result<f64> {
    value_to_f64(field(object, key)?)
        .map_err(|err| Error::malformed(format!("{key}: {}", err.message), object.to_string()))
}

fn i64_field(object: &Value, key: &str) -> Result<i64> {
    value_to_i64(field(object, key)?)
        .map_err(|err| Error::malformed(format!("{key}: {}", err.message), object.to_string()))
}

fn f64_or_zero(object: &Value, key: &str) -> Result<f64> {
    match object.get(key) {
        Some(_) => f64_field(object, key),
        None => Ok(0.0),
    }
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::malformed(format!("{what} should be array"), value.to_string()))
}

pub fn parse_server_time(value: &Value) -> Result<i64> {
    i64_field(value, "serverTime")
}

pub fn parse_symbols(value: &Value, quote_assets: &[&str]) -> Result<SymbolsOverview> {
    let mut overview = SymbolsOverview::default();
    for pair in array(field(value, "symbols")?, "symbols")? {
        let symbol = str_field(pair, "symbol")?;
        let status = str_field(pair, "status")?;
        if status != "TRADING" {
            overview.offline.push(symbol);
            continue;
        }
        overview.online.push(symbol.clone());
        let quote_asset = str_field(pair, "quoteAsset")?;
        if quote_assets.contains(&quote_asset.as_str()) {
            overview.trading.push(symbol.clone());
            overview.trading_data.push(SymbolInfo {
                symbol,
                status,
                base_asset: str_field(pair, "baseAsset")?,
                quote_asset,
                price_precision: i64_field(pair, "pricePrecision")? as u32,
                quantity_precision: i64_field(pair, "quantityPrecision")? as u32,
            });
        }
    }
    Ok(overview)
}

pub fn parse_ticker(value: &Value) -> Result<Ticker24h> {
    Ok(Ticker24h {
        symbol: str_field(value, "symbol")?,
        price_change: f64_field(value, "priceChange")?,
        price_change_percent: f64_field(value, "priceChangePercent")?,
        last_price: f64_field(value, "lastPrice")?,
        open_price: f64_field(value, "openPrice")?,
        high_price: f64_field(value, "highPrice")?,
        low_price: f64_field(value, "lowPrice")?,
        volume: f64_field(value, "volume")?,
        quote_volume: f64_field(value, "quoteVolume")?,
        open_time: i64_field(value, "openTime")?,
        close_time: i64_field(value, "closeTime")?,
    })
}

pub fn parse_account(value: &Value) -> Result<AccountInfo> {
    let mut assets = Vec::new();
    for item in array(field(value, "assets")?, "assets")? {
        assets.push(AssetBalance {
            asset: str_field(item, "asset")?,
            wallet_balance: f64_field(item, "walletBalance")?,
            available_balance: f64_or_zero(item, "availableBalance")?,
            unrealized_profit: f64_or_zero(item, "unrealizedProfit")?,
        });
    }
    Ok(AccountInfo {
        total_wallet_balance: f64_field(value, "totalWalletBalance")?,
        total_unrealized_profit: f64_or_zero(value, "totalUnrealizedProfit")?,
        available_balance: f64_or_zero(value, "availableBalance")?,
        assets,
    })
}

pub fn parse_positions(value: &Value) -> Result<Vec<PositionRisk>> {
    let mut positions = Vec::new();
    for item in array(value, "positionRisk")? {
        positions.push(PositionRisk {
            symbol: str_field(item, "symbol")?,
            position_amt: f64_field(item, "positionAmt")?,
            entry_price: f64_field(item, "entryPrice")?,
            mark_price: f64_or_zero(item, "markPrice")?,
            liquidation_price: f64_or_zero(item, "liquidationPrice")?,
            leverage: f64_or_zero(item, "leverage")? as u32,
            margin_type: item
                .get("marginType")
                .and_then(|value| value.as_str())
                .unwrap_or("")
                .to_string(),
            unrealized_profit: f64_or_zero(item, "unRealizedProfit")?,
        });
    }
    Ok(positions)
}

pub fn parse_order(value: &Value) -> Result<OrderInfo> {
    Ok(OrderInfo {
        order_id: i64_field(value, "orderId")?,
        client_order_id: value
            .get("clientOrderId")
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string(),
        symbol: str_field(value, "symbol")?,
        status: str_field(value, "status")?
            .parse()
            .map_err(|err: Error| Error::malformed(err.message, value.to_string()))?,
        order_type: str_field(value, "type")?,
        side: str_field(value, "side")?
            .parse()
            .map_err(|err: Error| Error::malformed(err.message, value.to_string()))?,
        price: f64_or_zero(value, "price")?,
        stop_price: f64_or_zero(value, "stopPrice")?,
        orig_qty: f64_or_zero(value, "origQty")?,
        executed_qty: f64_or_zero(value, "executedQty")?,
        reduce_only: value
            .get("reduceOnly")
            .and_then(|value| value.as_bool())
            .unwrap_or(false),
        update_time: match value.get("updateTime") {
            Some(_) => i64_field(value, "updateTime")?,
            None => 0,
        },
    })
}

pub fn parse_orders(value: &Value) -> Result<Vec<OrderInfo>> {
    array(value, "orders")?.iter().map(parse_order).collect()
}
