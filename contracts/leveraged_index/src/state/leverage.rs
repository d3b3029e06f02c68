use leverset::types::SwapVenue;
use soroban_sdk::{contracttype, Address, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPair {
    pub collateral: Address,
    pub borrow: Address,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairState {
    Uninitialized,
    Enabled,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeverageConfig {
    pub collateral_asset: Address,
    pub borrow_asset: Address,
    /// Denomination asset for quote issuance and redemption
    pub quote_asset: Address,
    /// Pairs that may be levered or delevered
    pub enabled_assets: Vec<AssetPair>,
    pub any_bot_allowed: bool,
    /// Venue used by swaps the index sizes itself (issuance, debt resolution)
    pub default_venue: SwapVenue,
    /// Tolerance applied to quotes on those swaps, in bps
    pub max_slippage_bps: u32,
}

impl LeverageConfig {
    pub fn is_enabled(&self, pair: &AssetPair) -> bool {
        self.enabled_assets.contains(pair)
    }

    pub fn borrow_assets(&self) -> Vec<Address> {
        let mut assets = Vec::new(self.enabled_assets.env());
        for pair in self.enabled_assets.iter() {
            if !assets.contains(&pair.borrow) {
                assets.push_back(pair.borrow);
            }
        }
        assets
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeverageParams {
    pub borrow_asset: Address,
    pub quote_asset: Address,
    pub default_venue: SwapVenue,
    pub max_slippage_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeverOutcome {
    pub borrowed: i128,
    pub collateral_received: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeleverOutcome {
    pub collateral_withdrawn: i128,
    pub borrow_received: i128,
    pub repaid: i128,
}
