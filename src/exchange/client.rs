use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::data::{fetch_klines, fetch_many, window, KlineSource};
use crate::exchange::endpoints;
use crate::exchange::params::Params;
use crate::exchange::parse;
use crate::exchange::signing::{authenticate, timestamp_ms};
use crate::exchange::transport::{HttpTransport, Transport};
use crate::models::price::{format_fixed, format_plain};
use crate::models::{
    AccountInfo, CandleSeries, Interval, OrderInfo, OrderRequest, OrderStatus, PositionRisk,
    Protection, StatusFilter, SymbolsOverview, Ticker24h,
};
use crate::{Error, Result};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// "No need to change margin type."
const MARGIN_TYPE_UNCHANGED: i64 = -4046;

pub struct FuturesClient<T = HttpTransport> {
    config: ClientConfig,
    credentials: Credentials,
    transport: T,
}

impl FuturesClient<HttpTransport> {
    pub fn connect(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout_secs, config.get_attempts)?;
        Self::with_transport(config, credentials, transport)
    }
}

impl<T: Transport> FuturesClient<T> {
    pub fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: T,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            credentials,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn v1(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url_v1)
    }

    fn v2(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url_v2)
    }

    fn sign_params(&self, params: Params) -> Result<Params> {
        let timestamp = timestamp_ms()? + self.config.request_delay_ms;
        authenticate(
            params,
            self.credentials.secret_key(),
            self.config.recv_window_ms,
            timestamp,
        )
    }

    fn signed_get(&self, url: &str, params: Params) -> Result<Value> {
        let params = self.sign_params(params)?;
        self.transport
            .get(url, &params, &[(API_KEY_HEADER, self.credentials.api_key())])
    }

    fn signed_post(&self, url: &str, params: Params) -> Result<Value> {
        let params = self.sign_params(params)?;
        self.transport
            .post(url, &params, &[(API_KEY_HEADER, self.credentials.api_key())])
    }

    fn signed_delete(&self, url: &str, params: Params) -> Result<Value> {
        let params = self.sign_params(params)?;
        self.transport
            .delete(url, &params, &[(API_KEY_HEADER, self.credentials.api_key())])
    }

    pub fn server_time(&self) -> Result<i64> {
        let json = self.transport.get(&self.v1(endpoints::TIME), &Params::new(), &[])?;
        parse::parse_server_time(&json)
    }

    pub fn test_connectivity(&self) -> bool {
        match self.server_time() {
            Ok(server_time) => {
                info!(server_time, "connected to exchange api");
                true
            }
            Err(err) => {
                warn!(error = %err, "exchange api unreachable");
                false
            }
        }
    }

    pub fn all_symbols(&self, quote_assets: &[&str]) -> Result<SymbolsOverview> {
        let json = self
            .transport
            .get(&self.v1(endpoints::EXCHANGE_INFO), &Params::new(), &[])?;
        parse::parse_symbols(&json, quote_assets)
    }

    /// Latest `limit` candles ending at `end_time`, paging when `limit` exceeds the
    /// per-request cap.
    pub fn symbol_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
        end_time: Option<i64>,
    ) -> Result<CandleSeries> {
        fetch_many(self, symbol, interval, limit, end_time)
    }

    /// The `subinterval` candles that make up the `interval` candle opening at
    /// `start_time`. For a candle still forming, only the sub-candles seen so far.
    pub fn symbol_sub_klines(
        &self,
        symbol: &str,
        interval: Interval,
        start_time: i64,
        subinterval: Interval,
    ) -> Result<CandleSeries> {
        let window = window(interval, subinterval, start_time, timestamp_ms()?)?;
        debug!(symbol, %interval, %subinterval, start_time, ?window, "sub-kline window");
        if window.limit == 0 {
            return Ok(CandleSeries::new());
        }
        self.symbol_klines(symbol, subinterval, window.limit, window.anchored_end_time())
    }

    pub fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h> {
        let params = Params::new().with("symbol", symbol);
        let json = self
            .transport
            .get(&self.v1(endpoints::TICKER_24HR), &params, &[])?;
        parse::parse_ticker(&json)
    }

    pub fn account(&self) -> Result<AccountInfo> {
        let json = self.signed_get(&self.v2(endpoints::ACCOUNT), Params::new())?;
        parse::parse_account(&json)
    }

    pub fn positions(&self, symbol: &str) -> Result<Vec<PositionRisk>> {
        let params = Params::new().with("symbol", symbol);
        let json = self.signed_get(&self.v2(endpoints::POSITION_RISK), params)?;
        parse::parse_positions(&json)
    }

    /// Sets leverage and switches the symbol to isolated margin.
    pub fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<()> {
        if !(1..=125).contains(&leverage) {
            return Err(Error::invalid_input(format!(
                "leverage must be in 1..=125, got {leverage}"
            )));
        }
        let params = Params::new()
            .with("symbol", symbol)
            .with("leverage", leverage);
        self.signed_post(&self.v1(endpoints::LEVERAGE), params)?;

        let params = Params::new()
            .with("symbol", symbol)
            .with("marginType", "ISOLATED");
        match self.signed_post(&self.v1(endpoints::MARGIN_TYPE), params) {
            Ok(_) => {}
            Err(err) if err.exchange_code() == Some(MARGIN_TYPE_UNCHANGED) => {}
            Err(err) => return Err(err),
        }
        info!(symbol, leverage, "leverage set with isolated margin");
        Ok(())
    }

    pub fn place_order(&self, order: &OrderRequest) -> Result<OrderInfo> {
        let params = order_params(order, self.config.price_precision)?;
        let json = self.signed_post(&self.v1(endpoints::ORDER), params)?;
        let placed = parse::parse_order(&json)?;
        info!(
            symbol = %placed.symbol,
            order_id = placed.order_id,
            order_type = %placed.order_type,
            side = order.side.as_str(),
            "order placed"
        );
        Ok(placed)
    }

    /// Validates an order against the test endpoint without placing it.
    pub fn test_order(&self, order: &OrderRequest) -> Result<()> {
        let params = order_params(order, self.config.price_precision)?;
        self.signed_post(&self.v1(endpoints::TEST_ORDER), params)?;
        Ok(())
    }

    pub fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderInfo> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("orderId", order_id);
        let json = self.signed_delete(&self.v1(endpoints::ORDER), params)?;
        info!(symbol, order_id, "order canceled");
        parse::parse_order(&json)
    }

    pub fn order_info(&self, symbol: &str, order_id: i64) -> Result<OrderInfo> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("orderId", order_id);
        let json = self.signed_get(&self.v1(endpoints::ORDER), params)?;
        parse::parse_order(&json)
    }

    pub fn all_orders(&self, symbol: &str, filter: StatusFilter) -> Result<Vec<OrderInfo>> {
        let params = Params::new().with("symbol", symbol);
        let json = self.signed_get(&self.v1(endpoints::ALL_ORDERS), params)?;
        let orders = parse::parse_orders(&json)?;
        Ok(match filter {
            StatusFilter::All => orders,
            StatusFilter::Only(status) => orders
                .into_iter()
                .filter(|order| order.status == status)
                .collect(),
        })
    }

    /// Cancels every open order on `symbol`; false when there was none.
    pub fn cancel_all_orders(&self, symbol: &str) -> Result<bool> {
        let orders = self.all_orders(symbol, StatusFilter::Only(OrderStatus::New))?;
        if orders.is_empty() {
            return Ok(false);
        }
        for order in &orders {
            self.cancel_order(symbol, order.order_id)?;
        }
        Ok(true)
    }

    fn open_position(&self, symbol: &str) -> Result<Option<PositionRisk>> {
        let positions = self.positions(symbol)?;
        Ok(positions
            .into_iter()
            .find(|position| position.symbol == symbol && !position.is_flat()))
    }

    /// `None` when flat. A position counts as protected when exactly two orders are
    /// open on it and they are a take-profit and a stop.
    pub fn protection_status(&self, symbol: &str) -> Result<Option<Protection>> {
        if self.open_position(symbol)?.is_none() {
            return Ok(None);
        }
        let orders = self.all_orders(symbol, StatusFilter::Only(OrderStatus::New))?;
        let has_take_profit = orders.iter().any(|order| order.order_type.contains("PROFIT"));
        let has_stop = orders.iter().any(|order| order.order_type.contains("STOP"));
        if orders.len() == 2 && has_take_profit && has_stop {
            return Ok(Some(Protection::Protected));
        }
        warn!(symbol, open_orders = orders.len(), "position is not protected");
        Ok(Some(Protection::NotProtected))
    }

    /// Flattens the position with a reduce-only market order, then cancels the
    /// remaining open orders. False when already flat.
    pub fn close_position(&self, symbol: &str) -> Result<bool> {
        let Some(position) = self.open_position(symbol)? else {
            return Ok(false);
        };
        let Some(side) = position.side() else {
            return Ok(false);
        };
        let quantity = position.position_amt.abs();
        let order = OrderRequest::market(symbol, side.reverse(), quantity, true);
        self.place_order(&order)?;
        self.cancel_all_orders(symbol)?;
        info!(symbol, amount = position.position_amt, "position closed");
        Ok(true)
    }

    /// Polls until the order fills. On timeout the order is canceled and false
    /// returned.
    pub fn wait_for_fill(
        &self,
        symbol: &str,
        order_id: i64,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<bool> {
        let started = Instant::now();
        loop {
            let order = self.order_info(symbol, order_id)?;
            if order.status == OrderStatus::Filled {
                info!(symbol, order_id, "order filled");
                return Ok(true);
            }
            if started.elapsed() >= timeout {
                warn!(symbol, order_id, status = order.status.as_str(), "fill timed out");
                self.cancel_order(symbol, order_id)?;
                return Ok(false);
            }
            std::thread::sleep(poll_interval);
        }
    }
}

impl<T: Transport> KlineSource for FuturesClient<T> {
    fn page_cap(&self) -> u32 {
        self.config.max_klines_per_request
    }

    fn fetch_page(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
        end_time: Option<i64>,
    ) -> Result<CandleSeries> {
        fetch_klines(
            &self.transport,
            &self.config.base_url_v1,
            symbol,
            interval,
            limit,
            end_time,
        )
    }
}

/// Unsigned order parameters. Prices keep `price_precision` decimals.
pub fn order_params(order: &OrderRequest, price_precision: u32) -> Result<Params> {
    if order.symbol.trim().is_empty() {
        return Err(Error::invalid_input("order symbol must be set"));
    }
    if order.quantity <= 0.0 {
        return Err(Error::invalid_input("order quantity must be positive"));
    }
    let mut params = Params::new()
        .with("symbol", &order.symbol)
        .with("side", order.side.as_str())
        .with("type", order.order_type.as_str())
        .with("quantity", format_plain(order.quantity)?);
    if let Some(price) = order.price {
        params.push("price", format_fixed(price, price_precision)?);
    }
    if let Some(stop_price) = order.stop_price {
        params.push("stopPrice", format_fixed(stop_price, price_precision)?);
    }
    params.push_opt("timeInForce", order.time_in_force.map(|tif| tif.as_str()));
    if order.reduce_only {
        params.push("reduceOnly", true);
    }
    params.push_opt("workingType", order.working_type.map(|kind| kind.as_str()));
    if order.price_protection {
        params.push("priceProtection", true);
    }
    Ok(params)
}
