pub mod fee;
pub mod issuance;
pub mod leverage;

use leverset::{
    constants::BPS_DENOMINATOR,
    error::{ErrorCode, LeverResult},
    math::wad::{mul_div_ceil, mul_div_floor},
    validate,
};
use soroban_sdk::{Address, Env};

use crate::{
    gateway::lending::LendingGateway,
    ledger::PositionLedger,
    state::leverage::LeverageConfig,
    storage::{get_collateral_asset, get_leverage_config, has_leverage_config},
};

/// Syncs the collateral and every enabled borrow asset.
pub fn sync_all(
    env: &Env,
    ledger: &mut PositionLedger,
    lending: &LendingGateway,
    config: &LeverageConfig,
) -> LeverResult {
    ledger.sync(env, lending, &config.collateral_asset)?;
    for asset in config.borrow_assets().iter() {
        if asset != config.collateral_asset {
            ledger.sync(env, lending, &asset)?;
        }
    }
    Ok(())
}

/// Lowest output accepted for a quoted `amount`.
pub fn less_slippage(env: &Env, amount: i128, slippage_bps: u32) -> LeverResult<i128> {
    mul_div_floor(
        env,
        amount,
        BPS_DENOMINATOR - slippage_bps as i128,
        BPS_DENOMINATOR,
    )
}

/// Highest input accepted for a quoted `amount`.
pub fn plus_slippage(env: &Env, amount: i128, slippage_bps: u32) -> LeverResult<i128> {
    mul_div_ceil(
        env,
        amount,
        BPS_DENOMINATOR + slippage_bps as i128,
        BPS_DENOMINATOR,
    )
}

/// Syncs every component the index tracks, configured or not.
pub fn sync_components(env: &Env, ledger: &mut PositionLedger, lending: &LendingGateway) -> LeverResult {
    for asset in ledger.assets(env).iter() {
        ledger.sync(env, lending, &asset)?;
    }
    Ok(())
}

/// Only the collateral, the enabled borrow assets and components already on
/// the books may be synced from outside.
pub fn validate_tracked_asset(env: &Env, ledger: &PositionLedger, asset: &Address) -> LeverResult {
    let tracked = *asset == get_collateral_asset(env)
        || ledger.index().component(asset).is_some()
        || (has_leverage_config(env) && get_leverage_config(env)?.borrow_assets().contains(asset));

    validate!(
        env,
        tracked,
        ErrorCode::InvalidState,
        "Leveraged Index: asset is not tracked by the index"
    )
}
