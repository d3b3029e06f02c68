use leverset::{
    constants::{
        INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
        PERSISTENT_LIFETIME_THRESHOLD,
    },
    error::{ErrorCode, LeverResult},
    types::SwapVenue,
};
use soroban_sdk::{contracttype, log, panic_with_error, Address, Env};

use crate::state::{
    fee::FeeConfig,
    index::IndexState,
    leverage::{AssetPair, LeverageConfig, PairState},
};

#[derive(Clone)]
#[contracttype]
pub struct AllowanceDataKey {
    pub from: Address,
    pub spender: Address,
}

#[contracttype]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Manager,
    LendingPool,
    CollateralAsset,
    Index,
    LeverageConfig,
    FeeConfig,
    Locked,
    SwapVenue(SwapVenue),
    AssetDecimals(Address),
    PairState(AssetPair),
    CallerPermission(Address),
    Balance(Address),
    Allowance(AllowanceDataKey),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ################################################################
//                             ADMIN
// ################################################################

pub fn get_manager(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Manager)
        .unwrap_or_else(|| {
            log!(env, "Leveraged Index: manager not set");
            panic_with_error!(env, ErrorCode::InvalidState)
        })
}

pub fn save_manager(env: &Env, manager: &Address) {
    env.storage().instance().set(&DataKey::Manager, manager);
}

pub fn get_lending_pool(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::LendingPool)
        .unwrap_or_else(|| {
            log!(env, "Leveraged Index: lending pool not set");
            panic_with_error!(env, ErrorCode::InvalidState)
        })
}

pub fn save_lending_pool(env: &Env, lending_pool: &Address) {
    env.storage().instance().set(&DataKey::LendingPool, lending_pool);
}

pub fn get_collateral_asset(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::CollateralAsset)
        .unwrap_or_else(|| {
            log!(env, "Leveraged Index: collateral asset not set");
            panic_with_error!(env, ErrorCode::InvalidState)
        })
}

pub fn save_collateral_asset(env: &Env, collateral_asset: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::CollateralAsset, collateral_asset);
}

// ################################################################
//                          POSITION LEDGER
// ################################################################

pub fn get_index(env: &Env) -> IndexState {
    env.storage()
        .instance()
        .get(&DataKey::Index)
        .unwrap_or_else(|| {
            log!(env, "Leveraged Index: index state not set");
            panic_with_error!(env, ErrorCode::InvalidState)
        })
}

pub fn save_index(env: &Env, index: &IndexState) {
    env.storage().instance().set(&DataKey::Index, index);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    env.storage().instance().set(&DataKey::Locked, &locked);
}

// ################################################################
//                             CONFIG
// ################################################################

pub fn has_leverage_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::LeverageConfig)
}

pub fn get_leverage_config(env: &Env) -> LeverResult<LeverageConfig> {
    env.storage()
        .instance()
        .get(&DataKey::LeverageConfig)
        .ok_or_else(|| {
            log!(env, "Leveraged Index: leverage config not initialized");
            ErrorCode::InvalidState
        })
}

pub fn save_leverage_config(env: &Env, config: &LeverageConfig) {
    env.storage().instance().set(&DataKey::LeverageConfig, config);
}

pub fn has_fee_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::FeeConfig)
}

pub fn get_fee_config(env: &Env) -> LeverResult<FeeConfig> {
    env.storage()
        .instance()
        .get(&DataKey::FeeConfig)
        .ok_or_else(|| {
            log!(env, "Leveraged Index: fee config not initialized");
            ErrorCode::InvalidState
        })
}

pub fn save_fee_config(env: &Env, config: &FeeConfig) {
    env.storage().instance().set(&DataKey::FeeConfig, config);
}

pub fn get_swap_venue(env: &Env, venue: SwapVenue) -> Option<Address> {
    env.storage().instance().get(&DataKey::SwapVenue(venue))
}

pub fn save_swap_venue(env: &Env, venue: SwapVenue, router: &Address) {
    env.storage().instance().set(&DataKey::SwapVenue(venue), router);
}

pub fn get_asset_decimals(env: &Env, asset: &Address) -> Option<u32> {
    env.storage()
        .instance()
        .get(&DataKey::AssetDecimals(asset.clone()))
}

pub fn save_asset_decimals(env: &Env, asset: &Address, decimals: u32) {
    env.storage()
        .instance()
        .set(&DataKey::AssetDecimals(asset.clone()), &decimals);
}

// ################################################################
//                          PERMISSIONS
// ################################################################

pub fn get_pair_state(env: &Env, pair: &AssetPair) -> PairState {
    let key = DataKey::PairState(pair.clone());
    match env.storage().persistent().get::<_, PairState>(&key) {
        Some(state) => {
            env.storage().persistent().extend_ttl(
                &key,
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            );
            state
        }
        None => PairState::Uninitialized,
    }
}

pub fn save_pair_state(env: &Env, pair: &AssetPair, state: PairState) {
    let key = DataKey::PairState(pair.clone());
    env.storage().persistent().set(&key, &state);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_caller_permission(env: &Env, caller: &Address) -> bool {
    let key = DataKey::CallerPermission(caller.clone());
    match env.storage().persistent().get::<_, bool>(&key) {
        Some(allowed) => {
            env.storage().persistent().extend_ttl(
                &key,
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            );
            allowed
        }
        None => false,
    }
}

pub fn save_caller_permission(env: &Env, caller: &Address, allowed: bool) {
    let key = DataKey::CallerPermission(caller.clone());
    env.storage().persistent().set(&key, &allowed);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
