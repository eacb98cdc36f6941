use crate::models::Side;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetBalance {
    pub asset: String,
    pub wallet_balance: f64,
    pub available_balance: f64,
    pub unrealized_profit: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountInfo {
    pub total_wallet_balance: f64,
    pub total_unrealized_profit: f64,
    pub available_balance: f64,
    pub assets: Vec<AssetBalance>,
}

impl AccountInfo {
    pub fn asset(&self, name: &str) -> Option<&AssetBalance> {
        self.assets.iter().find(|balance| balance.asset == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionRisk {
    pub symbol: String,
    /// Signed: negative for shorts.
    pub position_amt: f64,
    pub entry_price: f64,
    pub mark_price: f64,
    pub liquidation_price: f64,
    pub leverage: u32,
    pub margin_type: String,
    pub unrealized_profit: f64,
}

impl PositionRisk {
    pub fn is_flat(&self) -> bool {
        self.position_amt == 0.0
    }

    pub fn side(&self) -> Option<Side> {
        if self.position_amt > 0.0 {
            Some(Side::Buy)
        } else if self.position_amt < 0.0 {
            Some(Side::Sell)
        } else {
            None
        }
    }
}
