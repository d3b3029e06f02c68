use leverset::{
    error::LeverResult,
    math::decimals::{from_wad_ceil, from_wad_floor, to_wad, wad_scale},
};
use soroban_sdk::{token, Address, Env};

use crate::storage::{get_asset_decimals, save_asset_decimals};

pub fn decimals(env: &Env, asset: &Address) -> u32 {
    match get_asset_decimals(env, asset) {
        Some(decimals) => decimals,
        None => {
            let decimals = token::Client::new(env, asset).decimals();
            save_asset_decimals(env, asset, decimals);
            decimals
        }
    }
}

/// Smallest amount of `asset` the index can move, in WAD.
pub fn dust(env: &Env, asset: &Address) -> LeverResult<i128> {
    wad_scale(env, decimals(env, asset))
}

/// Idle balance of `asset` held by the index.
pub fn balance(env: &Env, asset: &Address) -> LeverResult<i128> {
    let native = token::Client::new(env, asset).balance(&env.current_contract_address());
    to_wad(env, native, decimals(env, asset))
}

/// What [`receive`] pulls for `amount` once rounded up to whole native units.
pub fn pull_amount(env: &Env, asset: &Address, amount: i128) -> LeverResult<i128> {
    let decimals = decimals(env, asset);
    to_wad(env, from_wad_ceil(env, amount, decimals)?, decimals)
}

/// `amount` rounded down to whole native units.
pub fn truncate(env: &Env, asset: &Address, amount: i128) -> LeverResult<i128> {
    let decimals = decimals(env, asset);
    to_wad(env, from_wad_floor(env, amount, decimals)?, decimals)
}

/// Pulls at least `amount` from `from`, returns the WAD amount received.
pub fn receive(env: &Env, asset: &Address, from: &Address, amount: i128) -> LeverResult<i128> {
    let decimals = decimals(env, asset);
    let native = from_wad_ceil(env, amount, decimals)?;
    if native > 0 {
        token::Client::new(env, asset).transfer(from, &env.current_contract_address(), &native);
    }
    to_wad(env, native, decimals)
}

/// Sends at most `amount` to `to`, returns the WAD amount sent.
pub fn send(env: &Env, asset: &Address, to: &Address, amount: i128) -> LeverResult<i128> {
    let decimals = decimals(env, asset);
    let native = from_wad_floor(env, amount, decimals)?;
    if native > 0 {
        token::Client::new(env, asset).transfer(&env.current_contract_address(), to, &native);
    }
    to_wad(env, native, decimals)
}

/// Lets `spender` pull `native_amount` during the current ledger only.
pub fn approve(env: &Env, asset: &Address, spender: &Address, native_amount: i128) {
    token::Client::new(env, asset).approve(
        &env.current_contract_address(),
        spender,
        &native_amount,
        &env.ledger().sequence(),
    );
}

pub fn revoke(env: &Env, asset: &Address, spender: &Address) {
    approve(env, asset, spender, 0);
}
