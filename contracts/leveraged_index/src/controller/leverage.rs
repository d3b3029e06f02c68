use leverset::{
    constants::MAX_DELEVER_ITERATIONS,
    error::{ErrorCode, LeverResult},
    math::{
        safe_math::SafeMath,
        wad::{mul_div_ceil, wad_mul},
    },
    types::SwapVenue,
    validate,
};
use soroban_sdk::{log, Address, Env, Vec};

use crate::{
    controller::{fee, less_slippage, plus_slippage},
    events::LeveragedIndexEvents,
    gateway::{lending::LendingGateway, swap::SwapGateway},
    ledger::PositionLedger,
    state::leverage::{AssetPair, DeleverOutcome, LeverOutcome, LeverageConfig, PairState},
    storage::{
        get_caller_permission, get_leverage_config, get_pair_state, save_leverage_config,
        save_pair_state,
    },
};

// ################################################################
//                          PERMISSIONS
// ################################################################

pub fn validate_pair(
    env: &Env,
    config: &LeverageConfig,
    collateral_asset: &Address,
    borrow_asset: &Address,
) -> LeverResult<AssetPair> {
    validate!(
        env,
        *collateral_asset == config.collateral_asset,
        ErrorCode::CollateralNotEnabled,
        "Leverage: collateral asset does not belong to the index"
    )?;

    let pair = AssetPair {
        collateral: collateral_asset.clone(),
        borrow: borrow_asset.clone(),
    };
    validate!(
        env,
        config.is_enabled(&pair),
        ErrorCode::BorrowNotEnabled,
        "Leverage: borrow asset not enabled"
    )?;
    Ok(pair)
}

/// Bots need both the global switch and an explicit grant. Being the manager
/// grants nothing here.
pub fn validate_bot(env: &Env, config: &LeverageConfig, caller: &Address) -> LeverResult {
    validate!(
        env,
        config.any_bot_allowed && get_caller_permission(env, caller),
        ErrorCode::Unauthorized,
        "Leverage: caller is not an allowed bot"
    )
}

pub fn update_enabled_assets(
    env: &Env,
    to_add: &Vec<Address>,
    to_remove: &Vec<Address>,
) -> LeverResult<LeverageConfig> {
    let mut config = get_leverage_config(env)?;
    let lending = LendingGateway::new(env);

    for borrow in to_add.iter() {
        validate!(
            env,
            borrow != config.collateral_asset,
            ErrorCode::BorrowNotEnabled,
            "Leverage: collateral cannot be borrowed against itself"
        )?;
        let pair = AssetPair {
            collateral: config.collateral_asset.clone(),
            borrow,
        };
        if !config.is_enabled(&pair) {
            config.enabled_assets.push_back(pair);
        }
    }

    for borrow in to_remove.iter() {
        validate!(
            env,
            lending.debt_balance(&borrow)? == 0,
            ErrorCode::OutstandingDebt,
            "Leverage: pair still carries debt"
        )?;
        let pair = AssetPair {
            collateral: config.collateral_asset.clone(),
            borrow,
        };
        if let Some(i) = config.enabled_assets.first_index_of(&pair) {
            config.enabled_assets.remove(i);
        }
        save_pair_state(env, &pair, PairState::Uninitialized);
    }

    save_leverage_config(env, &config);
    Ok(config)
}

// ################################################################
//                         LEVER / DELEVER
// ################################################################

/// Borrows `borrow_quantity_units` per share, swaps the proceeds into
/// collateral and supplies it.
#[allow(clippy::too_many_arguments)]
pub fn lever(
    env: &Env,
    ledger: &mut PositionLedger,
    caller: &Address,
    borrow_asset: &Address,
    collateral_asset: &Address,
    borrow_quantity_units: i128,
    min_receive_quantity_units: i128,
    venue: SwapVenue,
    hops: &Vec<Address>,
) -> LeverResult<LeverOutcome> {
    let config = get_leverage_config(env)?;
    let pair = validate_pair(env, &config, collateral_asset, borrow_asset)?;
    validate!(
        env,
        borrow_quantity_units > 0 && min_receive_quantity_units >= 0,
        ErrorCode::InvalidAmount,
        "Leverage: invalid lever quantities"
    )?;

    fee::accrue_fee(env, ledger)?;

    let supply = ledger.total_supply();
    validate!(
        env,
        supply > 0,
        ErrorCode::InvalidState,
        "Leverage: cannot lever an index without shares"
    )?;

    let lending = LendingGateway::new(env);
    let swap = SwapGateway::new(env, venue)?;
    let path = SwapGateway::path(env, borrow_asset, hops, collateral_asset);

    let borrow_notional = wad_mul(env, borrow_quantity_units, supply)?;
    let min_receive_notional = wad_mul(env, min_receive_quantity_units, supply)?;

    validate!(
        env,
        swap.quote_out(&path, borrow_notional)? >= min_receive_notional,
        ErrorCode::SlippageExceeded,
        "Leverage: swap output below the requested minimum"
    )?;

    let borrowed = lending.borrow(borrow_asset, borrow_notional)?;
    let received = swap.swap_exact_in(&path, borrowed, min_receive_notional)?;
    validate!(
        env,
        received >= min_receive_notional,
        ErrorCode::SlippageExceeded,
        "Leverage: swap output below the requested minimum"
    )?;
    let deposited = lending.deposit(collateral_asset, received)?;

    save_pair_state(env, &pair, PairState::Enabled);

    ledger.sync(env, &lending, collateral_asset)?;
    ledger.sync(env, &lending, borrow_asset)?;

    LeveragedIndexEvents::lever(
        env,
        caller.clone(),
        borrow_asset.clone(),
        collateral_asset.clone(),
        borrowed,
        deposited,
    );

    Ok(LeverOutcome {
        borrowed,
        collateral_received: deposited,
    })
}

/// Withdraws `redeem_quantity_units` of collateral per share, swaps it into
/// the borrow asset and repays debt. Output above the outstanding debt stays
/// in the index as an idle default position.
#[allow(clippy::too_many_arguments)]
pub fn delever(
    env: &Env,
    ledger: &mut PositionLedger,
    caller: &Address,
    collateral_asset: &Address,
    borrow_asset: &Address,
    redeem_quantity_units: i128,
    min_repay_quantity_units: i128,
    venue: SwapVenue,
    hops: &Vec<Address>,
) -> LeverResult<DeleverOutcome> {
    let config = get_leverage_config(env)?;
    let pair = validate_pair(env, &config, collateral_asset, borrow_asset)?;
    validate!(
        env,
        get_pair_state(env, &pair) == PairState::Enabled,
        ErrorCode::BorrowNotEnabled,
        "Leverage: pair was never levered"
    )?;
    validate!(
        env,
        redeem_quantity_units > 0 && min_repay_quantity_units >= 0,
        ErrorCode::InvalidAmount,
        "Leverage: invalid delever quantities"
    )?;

    fee::accrue_fee(env, ledger)?;

    let supply = ledger.total_supply();
    validate!(
        env,
        supply > 0,
        ErrorCode::InvalidState,
        "Leverage: cannot delever an index without shares"
    )?;

    let lending = LendingGateway::new(env);
    let swap = SwapGateway::new(env, venue)?;
    let path = SwapGateway::path(env, collateral_asset, hops, borrow_asset);

    let collateral_notional = wad_mul(env, redeem_quantity_units, supply)?;
    let min_repay_notional = wad_mul(env, min_repay_quantity_units, supply)?;

    validate!(
        env,
        swap.quote_out(&path, collateral_notional)? >= min_repay_notional,
        ErrorCode::SlippageBelowMinimum,
        "Leverage: swap output below the minimum repay amount"
    )?;

    let withdrawn = lending.withdraw(
        collateral_asset,
        collateral_notional,
        &env.current_contract_address(),
    )?;
    let received = swap.swap_exact_in(&path, withdrawn, min_repay_notional)?;
    validate!(
        env,
        received >= min_repay_notional,
        ErrorCode::SlippageBelowMinimum,
        "Leverage: swap output below the minimum repay amount"
    )?;

    let debt = lending.debt_balance(borrow_asset)?;
    let repaid = lending.repay(borrow_asset, received.min(debt))?;

    ledger.sync(env, &lending, collateral_asset)?;
    ledger.sync(env, &lending, borrow_asset)?;

    LeveragedIndexEvents::delever(
        env,
        caller.clone(),
        collateral_asset.clone(),
        borrow_asset.clone(),
        withdrawn,
        received,
        repaid,
    );

    Ok(DeleverOutcome {
        collateral_withdrawn: withdrawn,
        borrow_received: received,
        repaid,
    })
}

// ################################################################
//                        DEBT RESOLUTION
// ################################################################

pub struct DebtResolution {
    pub repaid: i128,
    pub collateral_spent: i128,
    /// Borrow asset bought but not needed for the repayment
    pub surplus: i128,
    pub rounds: u32,
}

/// Repays `debt` of `borrow_asset` by selling at most `collateral_budget` of
/// supplied collateral on the default venue.
///
/// Each round withdraws only what the pool releases without breaching the
/// loan-to-value ratio. When that covers the remaining debt, the round buys
/// the exact debt and supplies back the unused collateral; otherwise it sells
/// everything withdrawable and repays partially, which frees more collateral
/// for the next round. Ends once the remaining debt is at or below
/// `tolerance`.
#[allow(clippy::too_many_arguments)]
pub fn repay_debt_from_collateral(
    env: &Env,
    lending: &LendingGateway,
    swap: &SwapGateway,
    config: &LeverageConfig,
    borrow_asset: &Address,
    debt: i128,
    collateral_budget: i128,
    tolerance: i128,
) -> LeverResult<DebtResolution> {
    let collateral_asset = &config.collateral_asset;
    let index = env.current_contract_address();
    let path = SwapGateway::path(env, collateral_asset, &Vec::new(env), borrow_asset);

    let mut remaining = debt;
    let mut resolution = DebtResolution {
        repaid: 0,
        collateral_spent: 0,
        surplus: 0,
        rounds: 0,
    };

    while remaining > tolerance && resolution.rounds < MAX_DELEVER_ITERATIONS {
        resolution.rounds += 1;

        let budget = collateral_budget.safe_sub(resolution.collateral_spent, env)?;
        let withdrawable = lending.max_withdrawable(collateral_asset)?.min(budget);
        validate!(
            env,
            withdrawable > 0,
            ErrorCode::DeleverNotConverged,
            "Leverage: no collateral left to repay debt with"
        )?;

        let probe_out = swap.quote_out(&path, withdrawable)?;
        validate!(
            env,
            probe_out > 0,
            ErrorCode::DeleverNotConverged,
            "Leverage: venue quotes nothing for the collateral"
        )?;
        let needed = plus_slippage(
            env,
            mul_div_ceil(env, remaining, withdrawable, probe_out)?,
            config.max_slippage_bps,
        )?;

        let bought = if needed <= withdrawable {
            let withdrawn = lending.withdraw(collateral_asset, needed, &index)?;
            match swap.swap_for_exact_out(&path, remaining, withdrawn) {
                Ok((spent, bought)) => {
                    let resupplied = lending.deposit(collateral_asset, withdrawn - spent)?;
                    resolution.collateral_spent += withdrawn - resupplied;
                    bought
                }
                Err(_) => {
                    log!(env, "Leverage: exact repay swap rejected, selling withdrawn collateral");
                    resolution.collateral_spent += withdrawn;
                    sell(env, swap, &path, withdrawn, config.max_slippage_bps)?
                }
            }
        } else {
            let withdrawn = lending.withdraw(collateral_asset, withdrawable, &index)?;
            resolution.collateral_spent += withdrawn;
            sell(env, swap, &path, withdrawn, config.max_slippage_bps)?
        };

        let repaid = lending.repay(borrow_asset, bought.min(remaining))?;
        resolution.surplus += bought - repaid;
        resolution.repaid += repaid;
        remaining = (remaining - repaid).max(0);
    }

    validate!(
        env,
        remaining <= tolerance,
        ErrorCode::DeleverNotConverged,
        "Leverage: debt left after the maximum number of delever rounds"
    )?;

    Ok(resolution)
}

fn sell(
    env: &Env,
    swap: &SwapGateway,
    path: &Vec<Address>,
    amount: i128,
    max_slippage_bps: u32,
) -> LeverResult<i128> {
    let min_out = less_slippage(env, swap.quote_out(path, amount)?, max_slippage_bps)?;
    swap.swap_exact_in(path, amount, min_out)
}
