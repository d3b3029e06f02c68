use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, token, Address, Env, Vec,
};

use crate::{
    constants::{BPS_DENOMINATOR, WAD},
    error::LeverResult,
    interfaces::lending_pool::{AccountData, InterestRateMode, LendingPool, ReceiptAsset},
    math::{
        decimals::to_wad,
        wad::{mul_div_floor, wad_mul},
    },
};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reserve {
    /// Base currency value of one whole token, WAD
    pub price: i128,
    pub decimals: u32,
    pub ltv: u32,
    pub liquidation_threshold: u32,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Reserves,
    Reserve(Address),
    Position(ReceiptAsset, Address),
}

#[contract]
pub struct MockLendingPool;

#[contractimpl]
impl MockLendingPool {
    pub fn set_reserve(env: Env, asset: Address, price: i128, ltv: u32, liquidation_threshold: u32) {
        let decimals = token::Client::new(&env, &asset).decimals();
        let mut reserves = get_reserves(&env);
        if !reserves.contains(&asset) {
            reserves.push_back(asset.clone());
            env.storage().instance().set(&DataKey::Reserves, &reserves);
        }
        env.storage().instance().set(
            &DataKey::Reserve(asset),
            &Reserve {
                price,
                decimals,
                ltv,
                liquidation_threshold,
            },
        );
    }

    pub fn set_price(env: Env, asset: Address, price: i128) {
        let mut reserve = get_reserve(&env, &asset);
        reserve.price = price;
        env.storage().instance().set(&DataKey::Reserve(asset), &reserve);
    }

    /// Grows the debt of `holder` as if interest had accrued.
    pub fn accrue_interest(env: Env, asset: Address, holder: Address, amount: i128) {
        let receipt = ReceiptAsset::Debt(asset);
        let debt = get_position(&env, &receipt, &holder);
        set_position(&env, &receipt, &holder, debt + amount);
    }
}

#[contractimpl]
impl LendingPool for MockLendingPool {
    fn deposit(env: Env, asset: Address, amount: i128, on_behalf_of: Address) {
        on_behalf_of.require_auth();
        get_reserve(&env, &asset);

        let pool = env.current_contract_address();
        token::Client::new(&env, &asset).transfer_from(&pool, &on_behalf_of, &pool, &amount);

        let receipt = ReceiptAsset::Collateral(asset);
        let balance = get_position(&env, &receipt, &on_behalf_of);
        set_position(&env, &receipt, &on_behalf_of, balance + amount);
    }

    fn withdraw(env: Env, asset: Address, amount: i128, owner: Address, to: Address) -> i128 {
        owner.require_auth();

        let receipt = ReceiptAsset::Collateral(asset.clone());
        let balance = get_position(&env, &receipt, &owner);
        if amount > balance {
            panic!("not enough collateral");
        }
        set_position(&env, &receipt, &owner, balance - amount);

        let data = account_data(&env, &owner);
        if data.total_debt_value > 0 && data.health_factor < WAD {
            panic!("health factor lower than liquidation threshold");
        }

        token::Client::new(&env, &asset).transfer(&env.current_contract_address(), &to, &amount);
        amount
    }

    fn borrow(
        env: Env,
        asset: Address,
        amount: i128,
        _rate_mode: InterestRateMode,
        _referral_code: u32,
        on_behalf_of: Address,
    ) {
        on_behalf_of.require_auth();
        get_reserve(&env, &asset);

        let receipt = ReceiptAsset::Debt(asset.clone());
        let debt = get_position(&env, &receipt, &on_behalf_of);
        set_position(&env, &receipt, &on_behalf_of, debt + amount);

        let data = account_data(&env, &on_behalf_of);
        let max_debt = unwrap(
            &env,
            mul_div_floor(&env, data.total_collateral_value, data.ltv as i128, BPS_DENOMINATOR),
        );
        if data.total_debt_value > max_debt {
            panic!("collateral cannot cover new borrow");
        }

        token::Client::new(&env, &asset).transfer(
            &env.current_contract_address(),
            &on_behalf_of,
            &amount,
        );
    }

    fn repay(
        env: Env,
        asset: Address,
        amount: i128,
        _rate_mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> i128 {
        on_behalf_of.require_auth();

        let receipt = ReceiptAsset::Debt(asset.clone());
        let debt = get_position(&env, &receipt, &on_behalf_of);
        let repaid = amount.min(debt);
        if repaid > 0 {
            let pool = env.current_contract_address();
            token::Client::new(&env, &asset).transfer_from(&pool, &on_behalf_of, &pool, &repaid);
            set_position(&env, &receipt, &on_behalf_of, debt - repaid);
        }
        repaid
    }

    fn balance_of(env: Env, receipt: ReceiptAsset, holder: Address) -> i128 {
        get_position(&env, &receipt, &holder)
    }

    fn get_account_data(env: Env, holder: Address) -> AccountData {
        account_data(&env, &holder)
    }
}

fn unwrap<T>(env: &Env, result: LeverResult<T>) -> T {
    result.unwrap_or_else(|error_code| panic_with_error!(env, error_code))
}

fn get_reserves(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Reserves)
        .unwrap_or(Vec::new(env))
}

fn get_reserve(env: &Env, asset: &Address) -> Reserve {
    env.storage()
        .instance()
        .get(&DataKey::Reserve(asset.clone()))
        .unwrap_or_else(|| panic!("reserve not listed"))
}

fn get_position(env: &Env, receipt: &ReceiptAsset, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Position(receipt.clone(), holder.clone()))
        .unwrap_or(0)
}

fn set_position(env: &Env, receipt: &ReceiptAsset, holder: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(receipt.clone(), holder.clone()), &amount);
}

fn value_of(env: &Env, amount: i128, reserve: &Reserve) -> i128 {
    unwrap(
        env,
        to_wad(env, amount, reserve.decimals).and_then(|amount| wad_mul(env, amount, reserve.price)),
    )
}

fn account_data(env: &Env, holder: &Address) -> AccountData {
    let mut total_collateral_value = 0_i128;
    let mut total_debt_value = 0_i128;
    let mut weighted_ltv = 0_i128;
    let mut weighted_threshold = 0_i128;

    for asset in get_reserves(env).iter() {
        let reserve = get_reserve(env, &asset);
        let collateral = get_position(env, &ReceiptAsset::Collateral(asset.clone()), holder);
        let debt = get_position(env, &ReceiptAsset::Debt(asset.clone()), holder);

        let collateral_value = value_of(env, collateral, &reserve);
        total_collateral_value += collateral_value;
        total_debt_value += value_of(env, debt, &reserve);
        weighted_ltv += collateral_value * reserve.ltv as i128;
        weighted_threshold += collateral_value * reserve.liquidation_threshold as i128;
    }

    let (ltv, liquidation_threshold) = if total_collateral_value > 0 {
        (
            (weighted_ltv / total_collateral_value) as u32,
            (weighted_threshold / total_collateral_value) as u32,
        )
    } else {
        (0, 0)
    };

    let max_debt = unwrap(
        env,
        mul_div_floor(env, total_collateral_value, ltv as i128, BPS_DENOMINATOR),
    );
    let available_borrows_value = (max_debt - total_debt_value).max(0);

    let health_factor = if total_debt_value == 0 {
        i128::MAX
    } else {
        let liquidation_value = unwrap(
            env,
            mul_div_floor(env, total_collateral_value, liquidation_threshold as i128, BPS_DENOMINATOR),
        );
        unwrap(env, mul_div_floor(env, liquidation_value, WAD, total_debt_value))
    };

    AccountData {
        total_collateral_value,
        total_debt_value,
        available_borrows_value,
        ltv,
        liquidation_threshold,
        health_factor,
    }
}
