pub mod client;
pub mod params;
pub mod parse;
pub mod signing;
pub mod transport;

pub use client::{FuturesClient, API_KEY_HEADER};
pub use params::Params;
pub use transport::{HttpTransport, Transport};

/// Paths relative to the versioned base URLs.
pub mod endpoints {
    pub const TIME: &str = "time";
    pub const EXCHANGE_INFO: &str = "exchangeInfo";
    pub const KLINES: &str = "klines";
    pub const TICKER_24HR: &str = "ticker/24hr";
    pub const LEVERAGE: &str = "leverage";
    pub const MARGIN_TYPE: &str = "marginType";
    pub const ORDER: &str = "order";
    pub const TEST_ORDER: &str = "order/test";
    pub const ALL_ORDERS: &str = "allOrders";
    // v2
    pub const ACCOUNT: &str = "account";
    pub const POSITION_RISK: &str = "positionRisk";
}
