use soroban_sdk::{contract, contractimpl, contracttype, panic_with_error, token, Address, Env, Vec};

use crate::{
    constants::{BPS_DENOMINATOR, WAD},
    error::LeverResult,
    interfaces::swap_router::SwapRouter,
    math::{
        decimals::{from_wad_ceil, from_wad_floor, to_wad},
        wad::{mul_div_ceil, mul_div_floor, wad_div_ceil, wad_mul},
    },
};

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Price(Address, Address),
    FeeBps,
    ExactOutDisabled,
}

/// Constant price router. Every hop converts at the configured price and
/// charges the same fee on the output.
#[contract]
pub struct MockSwapRouter;

#[contractimpl]
impl MockSwapRouter {
    /// Sets how many whole `to` tokens one whole `from` token buys (WAD), and
    /// the inverse price for the opposite direction.
    pub fn set_price(env: Env, from: Address, to: Address, price: i128) {
        let inverse = unwrap(&env, wad_div_ceil(&env, WAD, price));
        env.storage().instance().set(&DataKey::Price(from.clone(), to.clone()), &price);
        env.storage().instance().set(&DataKey::Price(to, from), &inverse);
    }

    pub fn set_fee(env: Env, fee_bps: u32) {
        env.storage().instance().set(&DataKey::FeeBps, &fee_bps);
    }

    /// Makes every `swap_for_exact_out` revert, as a venue without exact
    /// output routing would.
    pub fn set_exact_out_enabled(env: Env, enabled: bool) {
        env.storage().instance().set(&DataKey::ExactOutDisabled, &!enabled);
    }
}

#[contractimpl]
impl SwapRouter for MockSwapRouter {
    fn quote_out(env: Env, path: Vec<Address>, amount_in: i128) -> i128 {
        amount_out_for(&env, &path, amount_in)
    }

    fn swap_exact_in(
        env: Env,
        path: Vec<Address>,
        amount_in: i128,
        min_out: i128,
        to: Address,
        deadline: u64,
    ) -> i128 {
        to.require_auth();
        check_deadline(&env, deadline);

        let amount_out = amount_out_for(&env, &path, amount_in);
        if amount_out < min_out {
            panic!("insufficient output amount");
        }
        settle(&env, &path, amount_in, amount_out, &to);
        amount_out
    }

    fn swap_for_exact_out(
        env: Env,
        path: Vec<Address>,
        amount_out: i128,
        max_in: i128,
        to: Address,
        deadline: u64,
    ) -> i128 {
        to.require_auth();
        check_deadline(&env, deadline);
        if env
            .storage()
            .instance()
            .get::<_, bool>(&DataKey::ExactOutDisabled)
            .unwrap_or(false)
        {
            panic!("exact output swaps disabled");
        }

        let amount_in = amount_in_for(&env, &path, amount_out);
        if amount_in > max_in {
            panic!("excessive input amount");
        }
        settle(&env, &path, amount_in, amount_out, &to);
        amount_in
    }
}

fn unwrap<T>(env: &Env, result: LeverResult<T>) -> T {
    result.unwrap_or_else(|error_code| panic_with_error!(env, error_code))
}

fn check_deadline(env: &Env, deadline: u64) {
    if env.ledger().timestamp() > deadline {
        panic!("deadline expired");
    }
}

fn fee_bps(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get::<_, u32>(&DataKey::FeeBps)
        .unwrap_or(0) as i128
}

fn price(env: &Env, from: &Address, to: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::Price(from.clone(), to.clone()))
        .unwrap_or_else(|| panic!("pair not supported"))
}

fn decimals(env: &Env, asset: &Address) -> u32 {
    token::Client::new(env, asset).decimals()
}

fn hops(path: &Vec<Address>) -> u32 {
    if path.len() < 2 {
        panic!("invalid path");
    }
    path.len() - 1
}

fn amount_out_for(env: &Env, path: &Vec<Address>, amount_in: i128) -> i128 {
    let fee = fee_bps(env);
    let mut amount = amount_in;
    for i in 0..hops(path) {
        let from = path.get_unchecked(i);
        let to = path.get_unchecked(i + 1);

        let amount_wad = unwrap(env, to_wad(env, amount, decimals(env, &from)));
        let gross = unwrap(env, wad_mul(env, amount_wad, price(env, &from, &to)));
        let net = unwrap(env, mul_div_floor(env, gross, BPS_DENOMINATOR - fee, BPS_DENOMINATOR));
        amount = unwrap(env, from_wad_floor(env, net, decimals(env, &to)));
    }
    amount
}

fn amount_in_for(env: &Env, path: &Vec<Address>, amount_out: i128) -> i128 {
    let fee = fee_bps(env);
    let mut amount = amount_out;
    for i in (0..hops(path)).rev() {
        let from = path.get_unchecked(i);
        let to = path.get_unchecked(i + 1);

        let net = unwrap(env, to_wad(env, amount, decimals(env, &to)));
        let gross = unwrap(env, mul_div_ceil(env, net, BPS_DENOMINATOR, BPS_DENOMINATOR - fee));
        let amount_wad = unwrap(env, mul_div_ceil(env, gross, WAD, price(env, &from, &to)));
        amount = unwrap(env, from_wad_ceil(env, amount_wad, decimals(env, &from)));
    }
    amount
}

fn settle(env: &Env, path: &Vec<Address>, amount_in: i128, amount_out: i128, to: &Address) {
    let router = env.current_contract_address();
    let token_in = path.get_unchecked(0);
    let token_out = path.get_unchecked(path.len() - 1);

    token::Client::new(env, &token_in).transfer_from(&router, to, &router, &amount_in);
    token::Client::new(env, &token_out).transfer(&router, to, &amount_out);
}
