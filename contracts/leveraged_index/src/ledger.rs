//! Position ledger: how much of each component one share represents.

use leverset::{
    constants::WAD,
    error::{ErrorCode, LeverResult},
    math::{
        safe_math::SafeMath,
        wad::{mul_div_ceil, mul_div_floor, wad_div, wad_div_ceil},
    },
    validate,
};
use soroban_sdk::{log, Address, Env, Map, Vec};
use soroban_token_sdk::TokenUtils;

use crate::{
    balance::{read_balance, receive_balance, spend_balance},
    gateway::{lending::LendingGateway, token},
    state::index::{Component, IndexState, PositionModule},
    storage::{get_index, save_index},
};

/// Working copy of the index state. Share mints and burns are buffered next
/// to it and only reach storage on [`PositionLedger::commit`].
pub struct PositionLedger {
    index: IndexState,
    share_deltas: Map<Address, i128>,
}

impl PositionLedger {
    pub fn load(env: &Env) -> Self {
        PositionLedger {
            index: get_index(env),
            share_deltas: Map::new(env),
        }
    }

    pub fn index(&self) -> &IndexState {
        &self.index
    }

    pub fn total_supply(&self) -> i128 {
        self.index.total_supply
    }

    pub fn position_multiplier(&self) -> i128 {
        self.index.position_multiplier
    }

    // ################################################################
    //                             UNITS
    // ################################################################

    pub fn get_default_unit(&self, env: &Env, asset: &Address) -> LeverResult<i128> {
        match self.index.component(asset) {
            Some(component) => mul_div_floor(
                env,
                component.default_virtual_unit,
                self.position_multiplier(),
                WAD,
            ),
            None => Ok(0),
        }
    }

    /// Debt magnitude per share held through `module`.
    pub fn get_external_unit(
        &self,
        env: &Env,
        module: PositionModule,
        asset: &Address,
    ) -> LeverResult<i128> {
        match self
            .index
            .component(asset)
            .and_then(|component| component.external_position(module))
        {
            Some(position) => mul_div_ceil(
                env,
                position.debt_virtual_unit,
                self.position_multiplier(),
                WAD,
            ),
            None => Ok(0),
        }
    }

    pub fn has_external_position(&self, module: PositionModule, asset: &Address) -> bool {
        self.index
            .component(asset)
            .and_then(|component| component.external_position(module))
            .is_some()
    }

    pub fn set_default_unit(&mut self, env: &Env, asset: &Address, real_unit: i128) -> LeverResult {
        validate!(
            env,
            real_unit >= 0,
            ErrorCode::MathError,
            "Position Ledger: negative default unit"
        )?;

        let mut component = match self.index.component(asset) {
            Some(component) => component,
            None if real_unit == 0 => return Ok(()),
            None => Component::new(env, asset.clone()),
        };
        component.default_virtual_unit =
            mul_div_floor(env, real_unit, WAD, self.position_multiplier())?;
        self.index.save_component(component);
        Ok(())
    }

    pub fn set_external_unit(
        &mut self,
        env: &Env,
        module: PositionModule,
        asset: &Address,
        real_unit: i128,
    ) -> LeverResult {
        validate!(
            env,
            real_unit >= 0,
            ErrorCode::MathError,
            "Position Ledger: negative debt unit"
        )?;

        let mut component = match self.index.component(asset) {
            Some(component) => component,
            None if real_unit == 0 => return Ok(()),
            None => Component::new(env, asset.clone()),
        };
        let virtual_unit = mul_div_ceil(env, real_unit, WAD, self.position_multiplier())?;
        component.set_external_virtual_unit(module, virtual_unit);
        self.index.save_component(component);
        Ok(())
    }

    pub fn edit_multiplier(&mut self, env: &Env, position_multiplier: i128) -> LeverResult {
        validate!(
            env,
            position_multiplier > 0 && position_multiplier <= WAD,
            ErrorCode::MathError,
            "Position Ledger: position multiplier out of range"
        )?;
        self.index.position_multiplier = position_multiplier;
        Ok(())
    }

    /// Zeroes every unit and puts the collateral back at one unit per share.
    /// Only valid while no shares are outstanding.
    pub fn reseed(&mut self, env: &Env, collateral_asset: &Address) -> LeverResult {
        validate!(
            env,
            self.total_supply() == 0,
            ErrorCode::InvalidState,
            "Position Ledger: cannot reseed an index with outstanding shares"
        )?;

        for asset in self.assets(env).iter() {
            self.zero_units(env, &asset)?;
        }
        self.set_default_unit(env, collateral_asset, WAD)
    }

    pub fn assets(&self, env: &Env) -> Vec<Address> {
        let mut assets = Vec::new(env);
        for component in self.index.components.iter() {
            assets.push_back(component.asset);
        }
        assets
    }

    fn zero_units(&mut self, env: &Env, asset: &Address) -> LeverResult {
        self.set_default_unit(env, asset, 0)?;
        if self.has_external_position(PositionModule::Leverage, asset) {
            self.set_external_unit(env, PositionModule::Leverage, asset, 0)?;
        }
        Ok(())
    }

    /// Recomputes the units of `asset` from what the index actually holds and
    /// owes. Interest and direct transfers are picked up here.
    pub fn sync(&mut self, env: &Env, lending: &LendingGateway, asset: &Address) -> LeverResult {
        let supply = self.total_supply();
        if supply == 0 {
            return self.zero_units(env, asset);
        }

        let held = lending
            .collateral_balance(asset)?
            .safe_add(token::balance(env, asset)?, env)?;
        let debt = lending.debt_balance(asset)?;

        self.set_default_unit(env, asset, wad_div(env, held, supply)?)?;
        if debt > 0 || self.has_external_position(PositionModule::Leverage, asset) {
            self.set_external_unit(
                env,
                PositionModule::Leverage,
                asset,
                wad_div_ceil(env, debt, supply)?,
            )?;
        }
        Ok(())
    }

    // ################################################################
    //                             SHARES
    // ################################################################

    pub fn balance_of(&self, env: &Env, holder: &Address) -> i128 {
        read_balance(env, holder) + self.share_deltas.get(holder.clone()).unwrap_or(0)
    }

    pub fn mint(&mut self, env: &Env, to: &Address, amount: i128) -> LeverResult {
        validate!(
            env,
            amount >= 0,
            ErrorCode::InvalidAmount,
            "Position Ledger: negative mint"
        )?;

        self.index.total_supply = self.index.total_supply.safe_add(amount, env)?;
        let delta = self.share_deltas.get(to.clone()).unwrap_or(0);
        self.share_deltas.set(to.clone(), delta.safe_add(amount, env)?);

        TokenUtils::new(env)
            .events()
            .mint(env.current_contract_address(), to.clone(), amount);
        Ok(())
    }

    pub fn burn(&mut self, env: &Env, from: &Address, amount: i128) -> LeverResult {
        validate!(
            env,
            amount >= 0 && self.balance_of(env, from) >= amount,
            ErrorCode::InsufficientBalance,
            "Position Ledger: burn exceeds share balance"
        )?;

        self.index.total_supply = self.index.total_supply.safe_sub(amount, env)?;
        let delta = self.share_deltas.get(from.clone()).unwrap_or(0);
        self.share_deltas.set(from.clone(), delta.safe_sub(amount, env)?);

        TokenUtils::new(env).events().burn(from.clone(), amount);
        Ok(())
    }

    /// Writes the index state and the buffered share balances.
    pub fn commit(self, env: &Env) -> LeverResult {
        for (holder, delta) in self.share_deltas.iter() {
            if delta > 0 {
                receive_balance(env, &holder, delta)?;
            } else if delta < 0 {
                spend_balance(env, &holder, -delta)?;
            }
        }
        save_index(env, &self.index);
        log!(env, "Position Ledger: committed, supply {}", self.index.total_supply);
        Ok(())
    }
}
