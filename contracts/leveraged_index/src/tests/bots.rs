use leverset::{constants::WAD, error::ErrorCode, types::SwapVenue};
use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, Address, Vec};

use super::setup::{native, wad, wad_frac, Fixture};
use crate::state::leverage::{DeleverOutcome, LeverOutcome};

fn auto_lever(
    fx: &Fixture,
    caller: &Address,
) -> Result<
    Result<LeverOutcome, soroban_sdk::ConversionError>,
    Result<ErrorCode, soroban_sdk::InvokeError>,
> {
    fx.index.try_auto_lever(
        caller,
        &fx.usdc.address,
        &fx.collateral.address,
        &wad(100),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    )
}

fn auto_delever(
    fx: &Fixture,
    caller: &Address,
) -> Result<
    Result<DeleverOutcome, soroban_sdk::ConversionError>,
    Result<ErrorCode, soroban_sdk::InvokeError>,
> {
    fx.index.try_auto_delever(
        caller,
        &fx.collateral.address,
        &fx.usdc.address,
        &wad_frac(1, 20),
        &0,
        &SwapVenue::Soroswap,
        &Vec::new(&fx.env),
    )
}

fn levered_fixture<'a>() -> Fixture<'a> {
    let fx = Fixture::new();
    let holder = Address::generate(&fx.env);
    fx.issue(&holder, WAD, native(1));
    fx.lever(wad(500), wad_frac(49, 100));
    fx
}

#[test]
fn bot_needs_global_switch_and_permission() {
    let fx = levered_fixture();
    let bot = Address::generate(&fx.env);

    assert_eq!(auto_lever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));

    fx.index.set_caller_permission(&fx.manager, &bot, &true);
    assert_eq!(auto_lever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));
    assert_eq!(auto_delever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));

    fx.index.update_any_bot_allowed(&fx.manager, &true);
    let outcome = auto_lever(&fx, &bot).unwrap().unwrap();
    assert_eq!(outcome.borrowed, wad(100));

    let outcome = auto_delever(&fx, &bot).unwrap().unwrap();
    assert_eq!(outcome.collateral_withdrawn, wad_frac(1, 20));
}

#[test]
fn globally_allowed_bot_without_permission_is_rejected() {
    let fx = levered_fixture();
    let bot = Address::generate(&fx.env);

    fx.index.update_any_bot_allowed(&fx.manager, &true);

    assert_eq!(auto_lever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));
    assert_eq!(auto_delever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));
}

#[test]
fn manager_gets_no_bot_rights() {
    let fx = levered_fixture();
    let manager = fx.manager.clone();

    fx.index.update_any_bot_allowed(&fx.manager, &true);

    assert_eq!(auto_lever(&fx, &manager), Err(Ok(ErrorCode::Unauthorized)));
}

#[test]
fn revoked_permission_stops_the_bot() {
    let fx = levered_fixture();
    let bot = Address::generate(&fx.env);

    fx.index.update_any_bot_allowed(&fx.manager, &true);
    fx.index.set_caller_permission(&fx.manager, &bot, &true);
    assert!(auto_lever(&fx, &bot).is_ok());

    fx.index.set_caller_permission(&fx.manager, &bot, &false);
    assert!(!fx.index.query_caller_permission(&bot));
    assert_eq!(auto_lever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));

    fx.index.set_caller_permission(&fx.manager, &bot, &true);
    fx.index.update_any_bot_allowed(&fx.manager, &false);
    assert_eq!(auto_lever(&fx, &bot), Err(Ok(ErrorCode::Unauthorized)));
}

#[test]
fn only_the_manager_grants_permissions() {
    let fx = Fixture::new();
    let bot = Address::generate(&fx.env);

    assert_eq!(
        fx.index.try_set_caller_permission(&bot, &bot, &true),
        Err(Ok(ErrorCode::Unauthorized))
    );
    assert_eq!(
        fx.index.try_update_any_bot_allowed(&bot, &true),
        Err(Ok(ErrorCode::Unauthorized))
    );
    assert!(!fx.index.query_caller_permission(&bot));
}
