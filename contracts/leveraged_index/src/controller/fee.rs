use leverset::{
    constants::{ONE_YEAR_IN_SECONDS, WAD},
    error::{ErrorCode, LeverResult},
    math::wad::mul_div_floor,
    validate,
};
use soroban_sdk::{log, Address, Env};

use crate::{
    events::LeveragedIndexEvents,
    ledger::PositionLedger,
    state::fee::{FeeConfig, FeeParams},
    storage::{get_fee_config, save_fee_config},
};

pub fn validate_fee_params(env: &Env, params: &FeeParams) -> LeverResult {
    validate!(
        env,
        params.max_streaming_fee_percentage <= WAD,
        ErrorCode::InvalidFee,
        "Fee: max streaming fee above 100%"
    )?;
    validate!(
        env,
        params.streaming_fee_percentage >= 0
            && params.streaming_fee_percentage <= params.max_streaming_fee_percentage,
        ErrorCode::InvalidFee,
        "Fee: streaming fee outside of [0, max]"
    )
}

/// Share of the index owed to the fee recipient since the last accrual.
pub fn calculate_fee_percentage(env: &Env, config: &FeeConfig, now: u64) -> LeverResult<i128> {
    let elapsed = now.saturating_sub(config.last_accrual_timestamp);
    mul_div_floor(
        env,
        config.streaming_fee_percentage,
        elapsed as i128,
        ONE_YEAR_IN_SECONDS as i128,
    )
}

/// Mints `supply * f / (1 - f)` shares to the fee recipient and scales the
/// position multiplier by `1 - f`, leaving every aggregate position intact.
pub fn accrue_fee(env: &Env, ledger: &mut PositionLedger) -> LeverResult<i128> {
    let mut config = get_fee_config(env)?;
    let now = env.ledger().timestamp();
    let fee_percentage = calculate_fee_percentage(env, &config, now)?;
    let supply = ledger.total_supply();

    let mut minted = 0;
    if fee_percentage > 0 && supply > 0 {
        validate!(
            env,
            fee_percentage < WAD,
            ErrorCode::MathError,
            "Fee: accrued fee would consume the whole index"
        )?;

        let retained = WAD - fee_percentage;
        minted = mul_div_floor(env, supply, fee_percentage, retained)?;
        let position_multiplier = mul_div_floor(env, ledger.position_multiplier(), retained, WAD)?;

        ledger.edit_multiplier(env, position_multiplier)?;
        ledger.mint(env, &config.fee_recipient, minted)?;

        LeveragedIndexEvents::fee_accrued(
            env,
            config.fee_recipient.clone(),
            minted,
            position_multiplier,
        );
    }

    config.last_accrual_timestamp = now;
    save_fee_config(env, &config);

    Ok(minted)
}

/// Accrues at the current rate before switching to `streaming_fee_percentage`.
/// A pending fee that would consume the whole index cannot be accrued; it is
/// dropped and the accrual period restarts at the new rate.
pub fn update_streaming_fee(
    env: &Env,
    ledger: &mut PositionLedger,
    streaming_fee_percentage: i128,
) -> LeverResult<FeeConfig> {
    let now = env.ledger().timestamp();
    if calculate_fee_percentage(env, &get_fee_config(env)?, now)? < WAD {
        accrue_fee(env, ledger)?;
    } else {
        log!(env, "Fee: pending fee exceeds the index, restarting the accrual period");
    }

    let mut config = get_fee_config(env)?;
    validate!(
        env,
        streaming_fee_percentage >= 0
            && streaming_fee_percentage <= config.max_streaming_fee_percentage,
        ErrorCode::InvalidFee,
        "Fee: streaming fee above the configured maximum"
    )?;

    config.streaming_fee_percentage = streaming_fee_percentage;
    config.last_accrual_timestamp = now;
    save_fee_config(env, &config);
    Ok(config)
}

pub fn update_fee_recipient(env: &Env, fee_recipient: Address) -> LeverResult<FeeConfig> {
    let mut config = get_fee_config(env)?;
    config.fee_recipient = fee_recipient;
    save_fee_config(env, &config);
    Ok(config)
}
