use leverset::{
    error::{ErrorCode, LeverResult},
    validate,
};
use soroban_sdk::{Address, Env};

use crate::storage::{AllowanceDataKey, AllowanceValue, DataKey};

pub fn read_allowance(env: &Env, from: Address, spender: Address) -> AllowanceValue {
    let key = DataKey::Allowance(AllowanceDataKey { from, spender });
    if let Some(allowance) = env.storage().temporary().get::<_, AllowanceValue>(&key) {
        if allowance.expiration_ledger < env.ledger().sequence() {
            AllowanceValue {
                amount: 0,
                expiration_ledger: allowance.expiration_ledger,
            }
        } else {
            allowance
        }
    } else {
        AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        }
    }
}

pub fn write_allowance(
    env: &Env,
    from: Address,
    spender: Address,
    amount: i128,
    expiration_ledger: u32,
) -> LeverResult {
    validate!(
        env,
        amount == 0 || expiration_ledger >= env.ledger().sequence(),
        ErrorCode::InvalidAmount,
        "Leveraged Index: allowance expires before the current ledger"
    )?;

    let key = DataKey::Allowance(AllowanceDataKey { from, spender });
    env.storage().temporary().set(
        &key,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );

    if amount > 0 {
        let live_for = expiration_ledger - env.ledger().sequence();
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
    Ok(())
}

pub fn spend_allowance(env: &Env, from: Address, spender: Address, amount: i128) -> LeverResult {
    let allowance = read_allowance(env, from.clone(), spender.clone());
    validate!(
        env,
        allowance.amount >= amount,
        ErrorCode::InsufficientAllowance,
        "Leveraged Index: not enough allowance"
    )?;
    if amount > 0 {
        write_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        )?;
    }
    Ok(())
}
