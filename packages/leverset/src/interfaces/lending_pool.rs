use soroban_sdk::{contractclient, contracttype, Address, Env};

/// Receipt positions a holder can have in a lending pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReceiptAsset {
    /// Supplied `asset` (aToken style balance)
    Collateral(Address),
    /// Borrowed `asset` (debt token style balance)
    Debt(Address),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum InterestRateMode {
    Stable = 1,
    Variable = 2,
}

/// Aggregated account position. Values share the pool's base currency,
/// `ltv` and `liquidation_threshold` are expressed in bps and the health
/// factor is WAD scaled.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountData {
    pub total_collateral_value: i128,
    pub total_debt_value: i128,
    pub available_borrows_value: i128,
    pub ltv: u32,
    pub liquidation_threshold: u32,
    pub health_factor: i128,
}

/// Lending market consumed by the index. Amounts are native token amounts.
/// Tokens are pulled from the payer with `transfer_from`.
#[contractclient(name = "LendingPoolClient")]
pub trait LendingPool {
    fn deposit(env: Env, asset: Address, amount: i128, on_behalf_of: Address);

    fn withdraw(env: Env, asset: Address, amount: i128, owner: Address, to: Address) -> i128;

    fn borrow(
        env: Env,
        asset: Address,
        amount: i128,
        rate_mode: InterestRateMode,
        referral_code: u32,
        on_behalf_of: Address,
    );

    fn repay(
        env: Env,
        asset: Address,
        amount: i128,
        rate_mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> i128;

    fn balance_of(env: Env, receipt: ReceiptAsset, holder: Address) -> i128;

    fn get_account_data(env: Env, holder: Address) -> AccountData;
}
