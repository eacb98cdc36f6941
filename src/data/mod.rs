pub mod klines;
pub mod paginator;
pub mod window;

pub use klines::{fetch_klines, parse_klines, MAX_KLINES_PER_REQUEST};
pub use paginator::{fetch_many, page_plan, KlineSource};
pub use window::{window, SubWindow};
