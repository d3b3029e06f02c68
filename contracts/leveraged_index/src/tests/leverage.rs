use leverset::{
    constants::WAD, error::ErrorCode, interfaces::lending_pool::ReceiptAsset, types::SwapVenue,
};
use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, vec, Address, Vec};

use super::setup::{assert_approx, deploy_token_contract, native, wad, wad_frac, Fixture, DUST};
use crate::state::{
    index::PositionModule,
    leverage::{AssetPair, DeleverOutcome, LeverOutcome, PairState},
};

#[test]
fn lever_borrows_per_share_units_and_supplies_the_proceeds() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let outcome = fx.lever(wad(500), wad_frac(49, 100));

    assert_eq!(
        outcome,
        LeverOutcome {
            borrowed: wad(500),
            collateral_received: 498_500_000_000_000_000,
        }
    );
    assert_eq!(fx.collateral_unit(), 1_498_500_000_000_000_000);
    assert_eq!(fx.debt_unit(), wad(500));
    assert_eq!(
        fx.index
            .query_pair_state(&fx.collateral.address, &fx.usdc.address),
        PairState::Enabled
    );
}

#[test]
fn lever_scales_with_supply() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, wad(2), native(2));

    let outcome = fx.lever(wad(500), wad_frac(49, 100));

    assert_eq!(outcome.borrowed, wad(1_000));
    assert_eq!(outcome.collateral_received, 997_000_000_000_000_000);
    assert_eq!(fx.collateral_unit(), 1_498_500_000_000_000_000);
    assert_eq!(fx.debt_unit(), wad(500));
}

#[test]
fn lever_up_to_the_ltv_limit_reaches_about_1_8_collateral_units() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let result = fx.index.try_lever(
        &fx.manager,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(801),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );
    assert!(result.is_err());

    // 800 USDC at 1000 per collateral, less the 0.3% venue fee
    fx.lever(wad(800), wad_frac(79, 100));

    assert_eq!(fx.collateral_unit(), 1_797_600_000_000_000_000);
    assert_eq!(fx.debt_unit(), wad(800));
    assert_approx(fx.collateral_unit(), wad_frac(18, 10), wad_frac(1, 100));
}

#[test]
fn lever_below_min_receive_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let result = fx.index.try_lever(
        &fx.manager,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(500),
        &wad_frac(1, 2),
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::SlippageExceeded)));
    assert_eq!(
        fx.index
            .query_pair_state(&fx.collateral.address, &fx.usdc.address),
        PairState::Uninitialized
    );
}

#[test]
fn lever_without_shares_fails() {
    let fx = Fixture::new();

    let result = fx.index.try_lever(
        &fx.manager,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(500),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::InvalidState)));
}

#[test]
fn lever_rejects_pairs_outside_the_config() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    let other = deploy_token_contract(&fx.env, &fx.manager);

    let result = fx.index.try_lever(
        &fx.manager,
        &other.address,
        &fx.collateral.address,
        &wad(500),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );
    assert_eq!(result, Err(Ok(ErrorCode::BorrowNotEnabled)));

    let result = fx.index.try_lever(
        &fx.manager,
        &fx.usdc.address,
        &other.address,
        &wad(500),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );
    assert_eq!(result, Err(Ok(ErrorCode::CollateralNotEnabled)));
}

#[test]
fn lever_through_unregistered_venue_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let result = fx.index.try_lever(
        &fx.manager,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(500),
        &0,
        &SwapVenue::Aquarius,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::SwapVenueNotFound)));
}

#[test]
fn lever_by_non_manager_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let result = fx.index.try_lever(
        &holder,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(500),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::Unauthorized)));
}

#[test]
fn delever_repays_debt_with_withdrawn_collateral() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    let outcome = fx.index.delever(
        &fx.manager,
        &fx.collateral.address,
        &fx.usdc.address,
        &wad_frac(1, 5),
        &wad(190),
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(
        outcome,
        DeleverOutcome {
            collateral_withdrawn: wad_frac(1, 5),
            borrow_received: wad_frac(1_994, 10),
            repaid: wad_frac(1_994, 10),
        }
    );
    assert_eq!(fx.collateral_unit(), 1_298_500_000_000_000_000);
    assert_eq!(fx.debt_unit(), wad_frac(3_006, 10));
}

#[test]
fn delever_beyond_the_debt_leaves_the_excess_idle() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    let outcome = fx.index.delever(
        &fx.manager,
        &fx.collateral.address,
        &fx.usdc.address,
        &wad_frac(3, 5),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(outcome.borrow_received, wad_frac(5_982, 10));
    assert_eq!(outcome.repaid, wad(500));
    assert_eq!(fx.debt_unit(), 0);
    assert_eq!(fx.index.get_default_unit(&fx.usdc.address), wad_frac(982, 10));
    assert_eq!(fx.usdc.balance(&fx.index.address), native(982) / 10);
}

#[test]
fn delever_below_min_repay_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    let result = fx.index.try_delever(
        &fx.manager,
        &fx.collateral.address,
        &fx.usdc.address,
        &wad_frac(1, 5),
        &wad(250),
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::SlippageBelowMinimum)));
}

#[test]
fn delever_before_first_lever_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    let result = fx.index.try_delever(
        &fx.manager,
        &fx.collateral.address,
        &fx.usdc.address,
        &wad_frac(1, 5),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::BorrowNotEnabled)));
}

#[test]
fn redemption_resolves_debt_over_several_rounds() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));
    fx.lever(wad(400), wad_frac(39, 100));

    // withdrawable collateral cannot cover 900 USDC in one swap
    let outcome = fx.index.redeem(&holder, &WAD, &holder, &0);

    assert_eq!(outcome.debt_repaid, wad(900));
    assert_approx(outcome.received, 994_591_800_000_000_000, 2 * DUST);
    assert_eq!(
        fx.pool.balance_of(
            &ReceiptAsset::Debt(fx.usdc.address.clone()),
            &fx.index.address
        ),
        0
    );
}

#[test]
fn redemption_sells_withdrawn_collateral_when_exact_output_is_rejected() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    fx.router.set_exact_out_enabled(&false);

    let outcome = fx.index.redeem(&holder, &WAD, &holder, &0);

    // the 0.5065195 collateral sized for the exact swap is sold outright for
    // 504.9999415 USDC, the excess over the debt goes to the holder
    assert_eq!(outcome.debt_repaid, wad(500));
    assert_eq!(outcome.received, 991_980_500_000_000_000);
    assert_eq!(fx.collateral.balance(&holder), 9_919_805);
    assert_eq!(fx.usdc.balance(&holder), 49_999_415);

    assert_eq!(
        fx.pool.balance_of(
            &ReceiptAsset::Debt(fx.usdc.address.clone()),
            &fx.index.address
        ),
        0
    );
    assert_eq!(
        fx.pool.balance_of(
            &ReceiptAsset::Collateral(fx.collateral.address.clone()),
            &fx.index.address
        ),
        0
    );
    assert_eq!(fx.usdc.balance(&fx.index.address), 0);
    assert_eq!(fx.collateral.balance(&fx.index.address), 0);
}

#[test]
fn redemption_fails_when_collateral_cannot_cover_the_debt() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    fx.router
        .set_price(&fx.collateral.address, &fx.usdc.address, &wad(300));

    let result = fx.index.try_redeem(&holder, &WAD, &holder, &0);

    assert_eq!(result, Err(Ok(ErrorCode::DeleverNotConverged)));
    assert_eq!(fx.index.balance(&holder), WAD);
}

#[test]
fn enabled_assets_stay_unique() {
    let fx = Fixture::new();
    let other = deploy_token_contract(&fx.env, &fx.manager);

    let config = fx.index.update_enabled_assets(
        &fx.manager,
        &vec![&fx.env, fx.usdc.address.clone(), other.address.clone()],
        &Vec::new(&fx.env),
    );

    assert_eq!(
        config.enabled_assets,
        vec![
            &fx.env,
            AssetPair {
                collateral: fx.collateral.address.clone(),
                borrow: fx.usdc.address.clone(),
            },
            AssetPair {
                collateral: fx.collateral.address.clone(),
                borrow: other.address.clone(),
            },
        ]
    );

    let config = fx.index.update_enabled_assets(
        &fx.manager,
        &Vec::new(&fx.env),
        &vec![&fx.env, other.address.clone()],
    );
    assert_eq!(config.enabled_assets.len(), 1);
    assert_eq!(
        fx.index
            .query_pair_state(&fx.collateral.address, &other.address),
        PairState::Uninitialized
    );
}

#[test]
fn removing_a_pair_with_debt_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    let result = fx.index.try_update_enabled_assets(
        &fx.manager,
        &Vec::new(&fx.env),
        &vec![&fx.env, fx.usdc.address.clone()],
    );

    assert_eq!(result, Err(Ok(ErrorCode::OutstandingDebt)));
}

#[test]
fn collateral_cannot_be_enabled_as_borrow_asset() {
    let fx = Fixture::new();

    let result = fx.index.try_update_enabled_assets(
        &fx.manager,
        &vec![&fx.env, fx.collateral.address.clone()],
        &Vec::new(&fx.env),
    );

    assert_eq!(result, Err(Ok(ErrorCode::BorrowNotEnabled)));
}

#[test]
fn accrued_interest_reaches_the_debt_unit_on_sync() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));

    fx.pool
        .accrue_interest(&fx.usdc.address, &fx.index.address, &native(10));
    assert_eq!(fx.debt_unit(), wad(500));

    fx.index.sync(&fx.usdc.address);

    assert_eq!(fx.debt_unit(), wad(510));
    assert_eq!(
        fx.index
            .get_external_unit(&PositionModule::Leverage, &fx.collateral.address),
        0
    );
}
