use leverset::constants::WAD;
use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, Address, String};

use super::setup::{native, wad, wad_frac, Fixture};

#[test]
fn share_token_metadata() {
    let fx = Fixture::new();

    assert_eq!(fx.index.decimals(), 18);
    assert_eq!(
        fx.index.name(),
        String::from_str(&fx.env, "Leveraged Collateral 2x")
    );
    assert_eq!(fx.index.symbol(), String::from_str(&fx.env, "COL2X"));
}

#[test]
fn transfer_moves_shares_without_touching_units() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let receiver = Address::generate(&fx.env);
    fx.issue(&holder, wad(2), native(2));

    fx.index.transfer(&holder, &receiver, &WAD);

    assert_eq!(fx.index.balance(&holder), WAD);
    assert_eq!(fx.index.balance(&receiver), WAD);
    assert_eq!(fx.index.total_supply(), wad(2));
    assert_eq!(fx.collateral_unit(), WAD);
}

#[test]
fn transfer_from_spends_the_allowance() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let spender = Address::generate(&fx.env);
    let receiver = Address::generate(&fx.env);
    fx.issue(&holder, wad(2), native(2));

    fx.index.approve(&holder, &spender, &WAD, &1_000);
    assert_eq!(fx.index.allowance(&holder, &spender), WAD);

    fx.index
        .transfer_from(&spender, &holder, &receiver, &wad_frac(1, 4));

    assert_eq!(fx.index.allowance(&holder, &spender), wad_frac(3, 4));
    assert_eq!(fx.index.balance(&receiver), wad_frac(1, 4));
}

#[test]
#[should_panic(expected = "Error(Contract, #8)")]
fn transfer_above_balance_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let receiver = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));

    fx.index.transfer(&holder, &receiver, &wad(2));
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn transfer_from_above_allowance_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let spender = Address::generate(&fx.env);
    fx.issue(&holder, wad(2), native(2));

    fx.index.approve(&holder, &spender, &WAD, &1_000);
    fx.index.transfer_from(&spender, &holder, &spender, &wad(2));
}

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn negative_transfer_fails() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let receiver = Address::generate(&fx.env);

    fx.index.transfer(&holder, &receiver, &-1);
}

#[test]
fn burn_leaves_the_position_to_the_remaining_holders() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let other = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.issue(&other, WAD, native(1));

    fx.index.burn(&holder, &wad_frac(1, 2));

    assert_eq!(fx.index.balance(&holder), wad_frac(1, 2));
    assert_eq!(fx.index.total_supply(), wad_frac(3, 2));
    // 2 collateral over 1.5 shares
    assert_eq!(fx.collateral_unit(), 1_333_333_333_333_333_333);
}

#[test]
fn burn_from_spends_the_allowance() {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    let spender = Address::generate(&fx.env);
    fx.issue(&holder, wad(2), native(2));

    fx.index.approve(&holder, &spender, &WAD, &1_000);
    fx.index.burn_from(&spender, &holder, &WAD);

    assert_eq!(fx.index.allowance(&holder, &spender), 0);
    assert_eq!(fx.index.total_supply(), WAD);
    assert_eq!(fx.collateral_unit(), wad(2));
}
