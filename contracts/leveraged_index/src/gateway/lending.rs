use leverset::{
    constants::{BPS_DENOMINATOR, DEFAULT_REFERRAL_CODE},
    error::{ErrorCode, LeverResult},
    interfaces::lending_pool::{AccountData, InterestRateMode, LendingPoolClient, ReceiptAsset},
    math::{
        decimals::{from_wad_floor, to_wad},
        safe_math::SafeMath,
        wad::{mul_div_ceil, mul_div_floor},
    },
    validate,
};
use soroban_sdk::{Address, Env};

use crate::{gateway::token, storage::get_lending_pool};

/// Lending pool position held by the index on behalf of its holders.
pub struct LendingGateway<'a> {
    env: &'a Env,
    pool: LendingPoolClient<'a>,
    holder: Address,
}

impl<'a> LendingGateway<'a> {
    pub fn new(env: &'a Env) -> Self {
        let pool = get_lending_pool(env);
        LendingGateway {
            env,
            pool: LendingPoolClient::new(env, &pool),
            holder: env.current_contract_address(),
        }
    }

    /// Supplies idle `asset` held by the index. Returns the WAD amount supplied.
    pub fn deposit(&self, asset: &Address, amount: i128) -> LeverResult<i128> {
        let decimals = token::decimals(self.env, asset);
        let native = from_wad_floor(self.env, amount, decimals)?;
        if native == 0 {
            return Ok(0);
        }

        token::approve(self.env, asset, &self.pool.address, native);
        self.pool.deposit(asset, &native, &self.holder);

        to_wad(self.env, native, decimals)
    }

    pub fn withdraw(&self, asset: &Address, amount: i128, to: &Address) -> LeverResult<i128> {
        let decimals = token::decimals(self.env, asset);
        let native = from_wad_floor(self.env, amount, decimals)?;
        if native == 0 {
            return Ok(0);
        }

        let withdrawn = self.pool.withdraw(asset, &native, &self.holder, to);

        to_wad(self.env, withdrawn, decimals)
    }

    /// Borrows at the variable rate. The proceeds land in the index.
    pub fn borrow(&self, asset: &Address, amount: i128) -> LeverResult<i128> {
        let decimals = token::decimals(self.env, asset);
        let native = from_wad_floor(self.env, amount, decimals)?;
        validate!(
            self.env,
            native > 0,
            ErrorCode::InvalidAmount,
            "Lending Gateway: borrow amount rounds to zero"
        )?;

        self.pool.borrow(
            asset,
            &native,
            &InterestRateMode::Variable,
            &DEFAULT_REFERRAL_CODE,
            &self.holder,
        );

        to_wad(self.env, native, decimals)
    }

    /// Repays up to `amount` from idle funds. Returns the WAD amount repaid.
    pub fn repay(&self, asset: &Address, amount: i128) -> LeverResult<i128> {
        let decimals = token::decimals(self.env, asset);
        let native = from_wad_floor(self.env, amount, decimals)?;
        if native == 0 {
            return Ok(0);
        }

        token::approve(self.env, asset, &self.pool.address, native);
        let repaid = self
            .pool
            .repay(asset, &native, &InterestRateMode::Variable, &self.holder);
        token::revoke(self.env, asset, &self.pool.address);

        to_wad(self.env, repaid, decimals)
    }

    pub fn collateral_balance(&self, asset: &Address) -> LeverResult<i128> {
        let native = self
            .pool
            .balance_of(&ReceiptAsset::Collateral(asset.clone()), &self.holder);
        to_wad(self.env, native, token::decimals(self.env, asset))
    }

    pub fn debt_balance(&self, asset: &Address) -> LeverResult<i128> {
        let native = self
            .pool
            .balance_of(&ReceiptAsset::Debt(asset.clone()), &self.holder);
        to_wad(self.env, native, token::decimals(self.env, asset))
    }

    pub fn account_data(&self) -> AccountData {
        self.pool.get_account_data(&self.holder)
    }

    /// Collateral that can leave the pool while the remaining position stays
    /// within the loan-to-value ratio.
    pub fn max_withdrawable(&self, asset: &Address) -> LeverResult<i128> {
        let balance = self.collateral_balance(asset)?;
        let data = self.account_data();

        if data.total_debt_value == 0 {
            return Ok(balance);
        }
        if data.total_collateral_value == 0 || data.ltv == 0 {
            return Ok(0);
        }

        let required_value = mul_div_ceil(
            self.env,
            data.total_debt_value,
            BPS_DENOMINATOR,
            data.ltv as i128,
        )?;
        if required_value >= data.total_collateral_value {
            return Ok(0);
        }

        let free_value = data.total_collateral_value.safe_sub(required_value, self.env)?;
        let withdrawable = mul_div_floor(
            self.env,
            balance,
            free_value,
            data.total_collateral_value,
        )?;

        Ok(withdrawable.min(balance))
    }

    /// Additional `asset` the pool would lend, priced through the debt the
    /// index already carries in that asset.
    pub fn max_borrowable(&self, asset: &Address) -> LeverResult<i128> {
        let debt = self.debt_balance(asset)?;
        let data = self.account_data();
        if debt == 0 || data.total_debt_value == 0 || data.available_borrows_value <= 0 {
            return Ok(0);
        }

        mul_div_floor(
            self.env,
            data.available_borrows_value,
            debt,
            data.total_debt_value,
        )
    }
}
