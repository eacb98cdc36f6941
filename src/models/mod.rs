pub mod account;
pub mod candle;
pub mod interval;
pub mod market;
pub mod orders;
pub mod price;

pub use account::{AccountInfo, AssetBalance, PositionRisk};
pub use candle::{Candle, CandleSeries};
pub use interval::Interval;
pub use market::{SymbolInfo, SymbolsOverview, Ticker24h};
pub use orders::{
    OrderInfo, OrderRequest, OrderStatus, OrderType, Protection, Side, StatusFilter,
    TimeInForce, WorkingType,
};
