use leverset::{
    constants::{ONE_YEAR_IN_SECONDS, WAD},
    error::ErrorCode,
};
use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, Address};
use test_case::test_case;

use super::setup::{assert_approx, native, wad, wad_frac, Fixture, START_TIMESTAMP};
use crate::state::fee::{FeeConfig, FeeParams};

const ONE_PERCENT: i128 = WAD / 100;

#[test]
fn fee_config_is_set_once() {
    let fx = Fixture::new();

    assert_eq!(
        fx.index.query_fee_config(),
        FeeConfig {
            fee_recipient: fx.fee_recipient.clone(),
            streaming_fee_percentage: 0,
            max_streaming_fee_percentage: WAD / 10,
            last_accrual_timestamp: START_TIMESTAMP,
        }
    );

    let result = fx.index.try_initialize_fee(
        &fx.manager,
        &FeeParams {
            fee_recipient: fx.fee_recipient.clone(),
            streaming_fee_percentage: ONE_PERCENT,
            max_streaming_fee_percentage: WAD / 10,
        },
    );
    assert_eq!(result, Err(Ok(ErrorCode::AlreadyInitialized)));
}

#[test]
fn streaming_fee_above_max_fails() {
    let fx = Fixture::new();

    let result = fx
        .index
        .try_update_streaming_fee(&fx.manager, &(WAD / 10 + 1));

    assert_eq!(result, Err(Ok(ErrorCode::InvalidFee)));
}

#[test]
fn accrual_mints_to_recipient_and_shrinks_the_multiplier() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.index.update_streaming_fee(&fx.manager, &ONE_PERCENT);

    fx.advance_time(ONE_YEAR_IN_SECONDS);
    assert_eq!(fx.index.query_pending_fee(), ONE_PERCENT);

    let minted = fx.index.accrue_fee();

    // supply * f / (1 - f)
    assert_eq!(minted, 10_101_010_101_010_101);
    assert_eq!(fx.index.balance(&fx.fee_recipient), minted);
    assert_eq!(fx.index.total_supply(), WAD + minted);
    assert_eq!(fx.index.position_multiplier(), wad_frac(99, 100));
    assert_eq!(fx.collateral_unit(), wad_frac(99, 100));
    assert_eq!(fx.index.query_pending_fee(), 0);

    // aggregate collateral is untouched
    let aggregate = fx.collateral_unit() * fx.index.total_supply() / WAD;
    assert_approx(aggregate, WAD, 10);
}

#[test]
fn accrual_scales_levered_units_together() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));
    fx.index.update_streaming_fee(&fx.manager, &(2 * ONE_PERCENT));

    fx.advance_time(ONE_YEAR_IN_SECONDS / 2);
    fx.index.accrue_fee();

    assert_eq!(fx.index.position_multiplier(), wad_frac(99, 100));
    assert_approx(fx.collateral_unit(), 1_483_515_000_000_000_000, 1);
    assert_approx(fx.debt_unit(), wad(495), 1);
}

#[test]
fn updating_the_rate_accrues_at_the_old_rate_first() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.index.update_streaming_fee(&fx.manager, &ONE_PERCENT);

    fx.advance_time(ONE_YEAR_IN_SECONDS);
    fx.index.update_streaming_fee(&fx.manager, &(5 * ONE_PERCENT));

    assert_eq!(fx.index.balance(&fx.fee_recipient), 10_101_010_101_010_101);
    assert_eq!(
        fx.index.query_fee_config().streaming_fee_percentage,
        5 * ONE_PERCENT
    );
}

#[test_case(0, 0 ; "no time elapsed")]
#[test_case(86_400, 273_785_078_713_210 ; "one day")]
#[test_case(ONE_YEAR_IN_SECONDS / 2, WAD / 20 ; "half a year")]
#[test_case(ONE_YEAR_IN_SECONDS, WAD / 10 ; "one year")]
fn pending_fee_grows_linearly(elapsed: u64, expected: i128) {
    let fx = Fixture::new();
    fx.index.update_streaming_fee(&fx.manager, &(10 * ONE_PERCENT));

    fx.advance_time(elapsed);

    assert_eq!(fx.index.query_pending_fee(), expected);
}

#[test]
fn no_shares_no_fee() {
    let fx = Fixture::new();
    fx.index.update_streaming_fee(&fx.manager, &ONE_PERCENT);

    fx.advance_time(ONE_YEAR_IN_SECONDS);

    assert_eq!(fx.index.accrue_fee(), 0);
    assert_eq!(fx.index.position_multiplier(), WAD);
    assert_eq!(
        fx.index.query_fee_config().last_accrual_timestamp,
        START_TIMESTAMP + ONE_YEAR_IN_SECONDS
    );
}

#[test]
fn fee_consuming_the_whole_index_fails() {
    let fx = Fixture::deploy(1_000, WAD);
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.index.update_streaming_fee(&fx.manager, &WAD);

    fx.advance_time(ONE_YEAR_IN_SECONDS);

    assert_eq!(fx.index.try_accrue_fee(), Err(Ok(ErrorCode::MathError)));
}

#[test]
fn rate_update_recovers_an_index_with_an_unpayable_fee() {
    let fx = Fixture::deploy(1_000, WAD);
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.index.update_streaming_fee(&fx.manager, &WAD);

    fx.advance_time(ONE_YEAR_IN_SECONDS);
    let config = fx.index.update_streaming_fee(&fx.manager, &ONE_PERCENT);

    assert_eq!(config.streaming_fee_percentage, ONE_PERCENT);
    assert_eq!(config.last_accrual_timestamp, fx.env.ledger().timestamp());
    assert_eq!(fx.index.balance(&fx.fee_recipient), 0);
    assert_eq!(fx.index.position_multiplier(), WAD);
    assert_eq!(fx.index.accrue_fee(), 0);

    let next = Address::generate(&fx.env);
    assert_eq!(fx.issue(&next, WAD, native(1)).cost, WAD);
}

#[test]
fn fee_recipient_is_updated() {
    let fx = Fixture::new();
    let recipient = Address::generate(&fx.env);

    let config = fx.index.update_fee_recipient(&fx.manager, &recipient);

    assert_eq!(config.fee_recipient, recipient);
    assert_eq!(
        fx.index.try_update_fee_recipient(&recipient, &recipient),
        Err(Ok(ErrorCode::Unauthorized))
    );
}
