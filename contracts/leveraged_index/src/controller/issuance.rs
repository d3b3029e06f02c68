use leverset::{
    constants::MAX_DELEVER_ITERATIONS,
    error::{ErrorCode, LeverResult},
    math::{
        safe_math::SafeMath,
        wad::{wad_mul, wad_mul_ceil},
    },
    validate,
};
use soroban_sdk::{Address, Env, Vec};

use crate::{
    controller::{fee, leverage::repay_debt_from_collateral, less_slippage, sync_all},
    events::LeveragedIndexEvents,
    gateway::{lending::LendingGateway, swap::SwapGateway, token},
    ledger::PositionLedger,
    state::{
        index::PositionModule,
        issuance::{AssetAmount, DebtLeg, IssueOutcome, RedeemOutcome},
        leverage::LeverageConfig,
    },
    storage::get_leverage_config,
};

/// What `quantity` new shares require, priced against the current units.
pub struct IssuePlan {
    pub quantity: i128,
    pub collateral_required: i128,
    /// Collateral the issuer pays: the required collateral less what the
    /// borrowed debt share buys
    pub equity: i128,
    pub debts: Vec<DebtLeg>,
    pub in_kind: Vec<AssetAmount>,
}

struct Redemption {
    collateral: i128,
    debt_repaid: i128,
    surplus: Vec<AssetAmount>,
}

// ################################################################
//                             ISSUE
// ################################################################

/// Accrues fees, syncs every unit and sizes the issuance. An empty index is
/// re-seeded at one collateral unit per share first.
pub fn prepare_issue(
    env: &Env,
    ledger: &mut PositionLedger,
    config: &LeverageConfig,
    quantity: i128,
) -> LeverResult<IssuePlan> {
    validate!(
        env,
        quantity > 0,
        ErrorCode::InvalidAmount,
        "Issuance: quantity must be positive"
    )?;

    fee::accrue_fee(env, ledger)?;
    let lending = LendingGateway::new(env);
    sync_all(env, ledger, &lending, config)?;

    if ledger.total_supply() == 0 {
        ledger.reseed(env, &config.collateral_asset)?;
    }

    let collateral_required = wad_mul_ceil(
        env,
        ledger.get_default_unit(env, &config.collateral_asset)?,
        quantity,
    )?;

    let mut equity = collateral_required;
    let mut debts = Vec::new(env);
    let mut in_kind = Vec::new(env);
    let borrow_assets = config.borrow_assets();

    for asset in borrow_assets.iter() {
        let debt_unit = ledger.get_external_unit(env, PositionModule::Leverage, &asset)?;
        let idle_share = wad_mul_ceil(env, ledger.get_default_unit(env, &asset)?, quantity)?;

        let borrow_amount = wad_mul_ceil(env, debt_unit, quantity)?;
        if idle_share > borrow_amount {
            in_kind.push_back(AssetAmount {
                asset: asset.clone(),
                amount: idle_share - borrow_amount,
            });
        }
        if borrow_amount == 0 {
            continue;
        }

        let swap_amount = (borrow_amount - idle_share).max(0);
        let expected_collateral = if swap_amount > 0 {
            let swap = SwapGateway::new(env, config.default_venue)?;
            let path = SwapGateway::path(env, &asset, &Vec::new(env), &config.collateral_asset);
            swap.quote_out(&path, swap_amount)?
        } else {
            0
        };
        equity = equity.safe_sub(expected_collateral, env)?;

        debts.push_back(DebtLeg {
            asset,
            borrow_amount,
            swap_amount,
            expected_collateral,
        });
    }

    for component in ledger.index().components.iter() {
        if component.asset == config.collateral_asset || borrow_assets.contains(&component.asset) {
            continue;
        }
        let amount = wad_mul_ceil(env, ledger.get_default_unit(env, &component.asset)?, quantity)?;
        if amount > 0 {
            in_kind.push_back(AssetAmount {
                asset: component.asset,
                amount,
            });
        }
    }

    validate!(
        env,
        equity > 0,
        ErrorCode::InvalidState,
        "Issuance: debt share exceeds the collateral of the issued shares"
    )?;

    Ok(IssuePlan {
        quantity,
        collateral_required,
        equity,
        debts,
        in_kind,
    })
}

/// Takes on the debt share of `plan` and mints the shares. The equity must
/// already sit idle in the index.
pub fn execute_issue(
    env: &Env,
    ledger: &mut PositionLedger,
    config: &LeverageConfig,
    issuer: &Address,
    to: &Address,
    plan: &IssuePlan,
) -> LeverResult {
    let lending = LendingGateway::new(env);

    for position in plan.in_kind.iter() {
        token::receive(env, &position.asset, issuer, position.amount)?;
    }

    lending.deposit(
        &config.collateral_asset,
        token::balance(env, &config.collateral_asset)?,
    )?;

    for leg in plan.debts.iter() {
        borrow_debt_leg(env, &lending, config, &leg)?;
    }

    ledger.mint(env, to, plan.quantity)?;
    sync_all(env, ledger, &lending, config)
}

/// Borrows the leg in chunks no larger than the pool will lend, supplying the
/// swapped collateral after each chunk to open room for the next.
fn borrow_debt_leg(
    env: &Env,
    lending: &LendingGateway,
    config: &LeverageConfig,
    leg: &DebtLeg,
) -> LeverResult {
    let swap = SwapGateway::new(env, config.default_venue)?;
    let path = SwapGateway::path(env, &leg.asset, &Vec::new(env), &config.collateral_asset);
    let dust = token::dust(env, &leg.asset)?;

    let mut remaining = leg.borrow_amount;
    let mut to_swap = leg.swap_amount;
    let mut rounds = 0;

    while remaining >= dust {
        validate!(
            env,
            rounds < MAX_DELEVER_ITERATIONS,
            ErrorCode::BorrowCapacityExceeded,
            "Issuance: debt share not borrowed within the round limit"
        )?;
        rounds += 1;

        let chunk = remaining.min(lending.max_borrowable(&leg.asset)?);
        validate!(
            env,
            chunk >= dust,
            ErrorCode::BorrowCapacityExceeded,
            "Issuance: lending pool has no capacity for the debt share"
        )?;

        let borrowed = lending.borrow(&leg.asset, chunk)?;
        remaining = remaining.safe_sub(borrowed, env)?;

        let sell = borrowed.min(to_swap);
        if sell > 0 {
            let min_out = less_slippage(env, swap.quote_out(&path, sell)?, config.max_slippage_bps)?;
            let received = swap.swap_exact_in(&path, sell, min_out)?;
            lending.deposit(&config.collateral_asset, received)?;
            to_swap -= sell;
        }
    }

    Ok(())
}

/// Issues `quantity` shares to `to` against collateral paid by `issuer`.
pub fn issue(
    env: &Env,
    ledger: &mut PositionLedger,
    issuer: &Address,
    to: &Address,
    quantity: i128,
    max_cost: i128,
) -> LeverResult<IssueOutcome> {
    let config = get_leverage_config(env)?;
    let plan = prepare_issue(env, ledger, &config, quantity)?;

    validate!(
        env,
        token::pull_amount(env, &config.collateral_asset, plan.equity)? <= max_cost,
        ErrorCode::SlippageExceeded,
        "Issuance: collateral cost above the maximum"
    )?;

    let cost = token::receive(env, &config.collateral_asset, issuer, plan.equity)?;
    execute_issue(env, ledger, &config, issuer, to, &plan)?;

    LeveragedIndexEvents::issue(env, issuer.clone(), to.clone(), quantity, cost);

    Ok(IssueOutcome { quantity, cost })
}

/// Issues against the quote asset: buys exactly the equity in collateral and
/// refunds whatever part of `max_quote_in` the swap did not use.
pub fn issue_with_quote(
    env: &Env,
    ledger: &mut PositionLedger,
    issuer: &Address,
    to: &Address,
    quantity: i128,
    max_quote_in: i128,
) -> LeverResult<IssueOutcome> {
    let config = get_leverage_config(env)?;
    if config.quote_asset == config.collateral_asset {
        return issue(env, ledger, issuer, to, quantity, max_quote_in);
    }

    validate!(
        env,
        max_quote_in > 0,
        ErrorCode::InvalidAmount,
        "Issuance: quote budget must be positive"
    )?;

    let plan = prepare_issue(env, ledger, &config, quantity)?;

    let swap = SwapGateway::new(env, config.default_venue)?;
    let path = SwapGateway::path(
        env,
        &config.quote_asset,
        &Vec::new(env),
        &config.collateral_asset,
    );

    let budget = token::truncate(env, &config.quote_asset, max_quote_in)?;
    let received = token::receive(env, &config.quote_asset, issuer, budget)?;
    let (spent, _) = swap.swap_for_exact_out(&path, plan.equity, received)?;
    token::send(env, &config.quote_asset, issuer, received.safe_sub(spent, env)?)?;

    execute_issue(env, ledger, &config, issuer, to, &plan)?;

    LeveragedIndexEvents::issue(env, issuer.clone(), to.clone(), quantity, spent);

    Ok(IssueOutcome {
        quantity,
        cost: spent,
    })
}

// ################################################################
//                             REDEEM
// ################################################################

/// Settles the debt share of `quantity` shares and withdraws the remaining
/// collateral share to `collateral_recipient`. Idle and surplus balances of
/// other assets go to `surplus_recipient`. Redeeming the whole supply settles
/// every outstanding position exactly.
#[allow(clippy::too_many_arguments)]
fn redeem_collateral(
    env: &Env,
    ledger: &mut PositionLedger,
    config: &LeverageConfig,
    redeemer: &Address,
    quantity: i128,
    collateral_recipient: &Address,
    surplus_recipient: &Address,
) -> LeverResult<Redemption> {
    validate!(
        env,
        quantity > 0,
        ErrorCode::InvalidAmount,
        "Redemption: quantity must be positive"
    )?;

    fee::accrue_fee(env, ledger)?;
    let lending = LendingGateway::new(env);
    sync_all(env, ledger, &lending, config)?;

    validate!(
        env,
        ledger.balance_of(env, redeemer) >= quantity,
        ErrorCode::InsufficientBalance,
        "Redemption: quantity exceeds share balance"
    )?;

    let full = quantity == ledger.total_supply();
    let collateral_asset = &config.collateral_asset;
    let collateral_share = wad_mul(env, ledger.get_default_unit(env, collateral_asset)?, quantity)?;

    lending.deposit(collateral_asset, token::balance(env, collateral_asset)?)?;

    let mut redemption = Redemption {
        collateral: 0,
        debt_repaid: 0,
        surplus: Vec::new(env),
    };
    let mut collateral_spent = 0_i128;
    let borrow_assets = config.borrow_assets();

    for asset in borrow_assets.iter() {
        let debt = lending.debt_balance(&asset)?;
        let idle = token::balance(env, &asset)?;

        let (owed, idle_share, tolerance) = if full {
            (debt, idle, 0)
        } else {
            let debt_unit = ledger.get_external_unit(env, PositionModule::Leverage, &asset)?;
            (
                wad_mul_ceil(env, debt_unit, quantity)?.min(debt),
                wad_mul(env, ledger.get_default_unit(env, &asset)?, quantity)?.min(idle),
                token::dust(env, &asset)?,
            )
        };

        let mut repaid = if owed > 0 && idle_share > 0 {
            lending.repay(&asset, idle_share.min(owed))?
        } else {
            0
        };
        let mut surplus = idle_share - repaid;

        let remaining = owed - repaid;
        if remaining > tolerance {
            let swap = SwapGateway::new(env, config.default_venue)?;
            let budget = if full {
                lending.collateral_balance(collateral_asset)?
            } else {
                collateral_share.safe_sub(collateral_spent, env)?
            };

            let resolution = repay_debt_from_collateral(
                env, &lending, &swap, config, &asset, remaining, budget, tolerance,
            )?;
            LeveragedIndexEvents::debt_resolved(
                env,
                asset.clone(),
                resolution.repaid,
                resolution.collateral_spent,
                resolution.rounds,
            );

            repaid += resolution.repaid;
            surplus += resolution.surplus;
            collateral_spent += resolution.collateral_spent;
        }

        redemption.debt_repaid += repaid;
        if surplus > 0 {
            let sent = token::send(env, &asset, surplus_recipient, surplus)?;
            redemption.surplus.push_back(AssetAmount { asset, amount: sent });
        }
    }

    for component in ledger.index().components.iter() {
        let asset = component.asset;
        if asset == *collateral_asset || borrow_assets.contains(&asset) {
            continue;
        }
        let amount = if full {
            token::balance(env, &asset)?
        } else {
            wad_mul(env, ledger.get_default_unit(env, &asset)?, quantity)?
        };
        if amount > 0 {
            let sent = token::send(env, &asset, surplus_recipient, amount)?;
            redemption.surplus.push_back(AssetAmount { asset, amount: sent });
        }
    }

    let collateral_out = if full {
        lending.collateral_balance(collateral_asset)?
    } else {
        collateral_share.safe_sub(collateral_spent, env)?
    };
    redemption.collateral = lending.withdraw(collateral_asset, collateral_out, collateral_recipient)?;

    ledger.burn(env, redeemer, quantity)?;
    Ok(redemption)
}

/// Redeems `quantity` shares of `redeemer` for collateral sent to `to`.
pub fn redeem(
    env: &Env,
    ledger: &mut PositionLedger,
    redeemer: &Address,
    to: &Address,
    quantity: i128,
    min_collateral_out: i128,
) -> LeverResult<RedeemOutcome> {
    let config = get_leverage_config(env)?;
    let redemption = redeem_collateral(env, ledger, &config, redeemer, quantity, to, to)?;

    validate!(
        env,
        redemption.collateral >= min_collateral_out,
        ErrorCode::SlippageBelowMinimum,
        "Redemption: collateral received below the minimum"
    )?;

    sync_all(env, ledger, &LendingGateway::new(env), &config)?;

    LeveragedIndexEvents::redeem(
        env,
        redeemer.clone(),
        to.clone(),
        quantity,
        redemption.collateral,
        redemption.debt_repaid,
    );

    Ok(RedeemOutcome {
        quantity,
        received: redemption.collateral,
        debt_repaid: redemption.debt_repaid,
    })
}

/// Redeems `quantity` shares and sells the collateral for the quote asset.
/// Surplus already denominated in the quote asset counts toward the output.
pub fn redeem_to_quote(
    env: &Env,
    ledger: &mut PositionLedger,
    redeemer: &Address,
    to: &Address,
    quantity: i128,
    min_quote_out: i128,
) -> LeverResult<RedeemOutcome> {
    let config = get_leverage_config(env)?;
    if config.quote_asset == config.collateral_asset {
        return redeem(env, ledger, redeemer, to, quantity, min_quote_out);
    }

    let index = env.current_contract_address();
    let redemption = redeem_collateral(env, ledger, &config, redeemer, quantity, &index, to)?;

    let quote_surplus = redemption
        .surplus
        .iter()
        .filter(|position| position.asset == config.quote_asset)
        .fold(0_i128, |total, position| total + position.amount);

    let swap = SwapGateway::new(env, config.default_venue)?;
    let path = SwapGateway::path(
        env,
        &config.collateral_asset,
        &Vec::new(env),
        &config.quote_asset,
    );
    let min_swap_out = (min_quote_out - quote_surplus).max(0);

    validate!(
        env,
        swap.quote_out(&path, redemption.collateral)? >= min_swap_out,
        ErrorCode::SlippageBelowMinimum,
        "Redemption: quote output below the minimum"
    )?;

    let bought = swap.swap_exact_in(&path, redemption.collateral, min_swap_out)?;
    let received = token::send(env, &config.quote_asset, to, bought)?.safe_add(quote_surplus, env)?;

    validate!(
        env,
        received >= min_quote_out,
        ErrorCode::SlippageBelowMinimum,
        "Redemption: quote output below the minimum"
    )?;

    sync_all(env, ledger, &LendingGateway::new(env), &config)?;

    LeveragedIndexEvents::redeem(
        env,
        redeemer.clone(),
        to.clone(),
        quantity,
        received,
        redemption.debt_repaid,
    );

    Ok(RedeemOutcome {
        quantity,
        received,
        debt_repaid: redemption.debt_repaid,
    })
}
