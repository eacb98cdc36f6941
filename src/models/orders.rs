use crate::{Error, Result};
use serde::Serialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn reverse(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// +1 for buy, -1 for sell.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(Error::invalid_input(format!("unknown side: {value}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OrderType {
    Limit,
    Market,
    Stop,
    StopMarket,
    TakeProfit,
    TakeProfitMarket,
    TrailingStopMarket,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
            OrderType::Stop => "STOP",
            OrderType::StopMarket => "STOP_MARKET",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            OrderType::TrailingStopMarket => "TRAILING_STOP_MARKET",
        }
    }

    pub fn is_take_profit(&self) -> bool {
        matches!(self, OrderType::TakeProfit | OrderType::TakeProfitMarket)
    }

    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            OrderType::Stop | OrderType::StopMarket | OrderType::TrailingStopMarket
        )
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "LIMIT" => Ok(OrderType::Limit),
            "MARKET" => Ok(OrderType::Market),
            "STOP" => Ok(OrderType::Stop),
            "STOP_MARKET" => Ok(OrderType::StopMarket),
            "TAKE_PROFIT" => Ok(OrderType::TakeProfit),
            "TAKE_PROFIT_MARKET" => Ok(OrderType::TakeProfitMarket),
            "TRAILING_STOP_MARKET" => Ok(OrderType::TrailingStopMarket),
            _ => Err(Error::invalid_input(format!("unknown order type: {value}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
    /// Post-only.
    Gtx,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
            TimeInForce::Gtx => "GTX",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WorkingType {
    MarkPrice,
    ContractPrice,
}

impl WorkingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingType::MarkPrice => "MARK_PRICE",
            WorkingType::ContractPrice => "CONTRACT_PRICE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PendingCancel,
    Rejected,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::PendingCancel => "PENDING_CANCEL",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Expired => "EXPIRED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "NEW" => Ok(OrderStatus::New),
            "PARTIALLY_FILLED" => Ok(OrderStatus::PartiallyFilled),
            "FILLED" => Ok(OrderStatus::Filled),
            "CANCELED" | "CANCELLED" => Ok(OrderStatus::Canceled),
            "PENDING_CANCEL" => Ok(OrderStatus::PendingCancel),
            "REJECTED" => Ok(OrderStatus::Rejected),
            "EXPIRED" => Ok(OrderStatus::Expired),
            _ => Err(Error::invalid_input(format!("unknown order status: {value}"))),
        }
    }
}

/// Which orders `all_orders` keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(OrderStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Only(OrderStatus::New)
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value == "ALL" {
            return Ok(StatusFilter::All);
        }
        value.parse().map(StatusFilter::Only)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
    pub stop_price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
    pub working_type: Option<WorkingType>,
    pub price_protection: bool,
}

impl OrderRequest {
    fn base(symbol: &str, side: Side, order_type: OrderType, quantity: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
            reduce_only: false,
            working_type: None,
            price_protection: false,
        }
    }

    pub fn market(symbol: &str, side: Side, quantity: f64, reduce_only: bool) -> Self {
        Self {
            reduce_only,
            ..Self::base(symbol, side, OrderType::Market, quantity)
        }
    }

    pub fn limit(symbol: &str, side: Side, quantity: f64, price: f64) -> Self {
        Self {
            price: Some(price),
            time_in_force: Some(TimeInForce::Gtc),
            ..Self::base(symbol, side, OrderType::Limit, quantity)
        }
    }

    /// Post-only limit order that can only shrink a position.
    pub fn reduce_only_limit(symbol: &str, side: Side, quantity: f64, price: f64) -> Self {
        Self {
            price: Some(price),
            reduce_only: true,
            time_in_force: Some(TimeInForce::Gtx),
            ..Self::base(symbol, side, OrderType::Limit, quantity)
        }
    }

    // The protective builders take the side of the position they guard and
    // trade the opposite way.

    pub fn take_profit_limit(
        symbol: &str,
        position_side: Side,
        quantity: f64,
        price: f64,
        stop_price: f64,
    ) -> Self {
        Self::protective(
            symbol,
            position_side,
            OrderType::TakeProfit,
            quantity,
            Some(price),
            stop_price,
            WorkingType::ContractPrice,
        )
    }

    pub fn take_profit_market(
        symbol: &str,
        position_side: Side,
        quantity: f64,
        stop_price: f64,
    ) -> Self {
        Self::protective(
            symbol,
            position_side,
            OrderType::TakeProfitMarket,
            quantity,
            None,
            stop_price,
            WorkingType::MarkPrice,
        )
    }

    pub fn stop_loss_limit(
        symbol: &str,
        position_side: Side,
        quantity: f64,
        price: f64,
        stop_price: f64,
    ) -> Self {
        Self::protective(
            symbol,
            position_side,
            OrderType::Stop,
            quantity,
            Some(price),
            stop_price,
            WorkingType::ContractPrice,
        )
    }

    pub fn stop_loss_market(
        symbol: &str,
        position_side: Side,
        quantity: f64,
        stop_price: f64,
    ) -> Self {
        Self::protective(
            symbol,
            position_side,
            OrderType::StopMarket,
            quantity,
            None,
            stop_price,
            WorkingType::MarkPrice,
        )
    }

    fn protective(
        symbol: &str,
        position_side: Side,
        order_type: OrderType,
        quantity: f64,
        price: Option<f64>,
        stop_price: f64,
        working_type: WorkingType,
    ) -> Self {
        Self {
            price,
            stop_price: Some(stop_price),
            time_in_force: Some(TimeInForce::Gtc),
            reduce_only: true,
            working_type: Some(working_type),
            price_protection: true,
            ..Self::base(symbol, position_side.reverse(), order_type, quantity)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderInfo {
    pub order_id: i64,
    pub client_order_id: String,
    pub symbol: String,
    pub status: OrderStatus,
    pub order_type: String,
    pub side: Side,
    pub price: f64,
    pub stop_price: f64,
    pub orig_qty: f64,
    pub executed_qty: f64,
    pub reduce_only: bool,
    pub update_time: i64,
}

/// Whether an open position carries both a take-profit and a stop order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Protection {
    Protected,
    NotProtected,
}
