use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub price_precision: u32,
    pub quantity_precision: u32,
}

/// Symbols from `exchangeInfo` split by trading state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SymbolsOverview {
    /// Every symbol currently trading.
    pub online: Vec<String>,
    /// Trading symbols whose quote asset was requested.
    pub trading: Vec<String>,
    /// Symbols on a break.
    pub offline: Vec<String>,
    pub trading_data: Vec<SymbolInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub last_price: f64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub open_time: i64,
    pub close_time: i64,
}
