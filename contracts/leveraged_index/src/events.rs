use leverset::types::SwapVenue;
use soroban_sdk::{Address, Env, String, Symbol, Vec};

use crate::state::leverage::LeverageConfig;

pub struct LeveragedIndexEvents {}

impl LeveragedIndexEvents {
    /// Emitted when the index is created
    ///
    /// - topics - `["initialize", manager: Address, collateral_asset: Address]`
    /// - data - `[name: String, symbol: String]`
    pub fn initialize(
        e: &Env,
        manager: Address,
        collateral_asset: Address,
        name: String,
        symbol: String,
    ) {
        let topics = (Symbol::new(e, "initialize"), manager, collateral_asset);
        e.events().publish(topics, (name, symbol));
    }

    /// Emitted when the manager sets the leverage config
    ///
    /// - topics - `["leverage_initialized", manager: Address]`
    /// - data - `config: LeverageConfig`
    pub fn leverage_initialized(e: &Env, manager: Address, config: LeverageConfig) {
        let topics = (Symbol::new(e, "leverage_initialized"), manager);
        e.events().publish(topics, config);
    }

    /// Emitted when the manager sets the fee config
    ///
    /// - topics - `["fee_initialized", manager: Address]`
    /// - data - `[fee_recipient: Address, streaming_fee_percentage: i128]`
    pub fn fee_initialized(
        e: &Env,
        manager: Address,
        fee_recipient: Address,
        streaming_fee_percentage: i128,
    ) {
        let topics = (Symbol::new(e, "fee_initialized"), manager);
        e.events()
            .publish(topics, (fee_recipient, streaming_fee_percentage));
    }

    /// Emitted when index shares are issued
    ///
    /// - topics - `["issue", issuer: Address, to: Address]`
    /// - data - `[quantity: i128, cost: i128]`
    pub fn issue(e: &Env, issuer: Address, to: Address, quantity: i128, cost: i128) {
        let topics = (Symbol::new(e, "issue"), issuer, to);
        e.events().publish(topics, (quantity, cost));
    }

    /// Emitted when index shares are redeemed
    ///
    /// - topics - `["redeem", redeemer: Address, to: Address]`
    /// - data - `[quantity: i128, received: i128, debt_repaid: i128]`
    pub fn redeem(
        e: &Env,
        redeemer: Address,
        to: Address,
        quantity: i128,
        received: i128,
        debt_repaid: i128,
    ) {
        let topics = (Symbol::new(e, "redeem"), redeemer, to);
        e.events().publish(topics, (quantity, received, debt_repaid));
    }

    /// Emitted when leverage is increased
    ///
    /// - topics - `["lever", caller: Address, borrow_asset: Address, collateral_asset: Address]`
    /// - data - `[borrowed: i128, collateral_received: i128]`
    pub fn lever(
        e: &Env,
        caller: Address,
        borrow_asset: Address,
        collateral_asset: Address,
        borrowed: i128,
        collateral_received: i128,
    ) {
        let topics = (Symbol::new(e, "lever"), caller, borrow_asset, collateral_asset);
        e.events().publish(topics, (borrowed, collateral_received));
    }

    /// Emitted when leverage is decreased
    ///
    /// - topics - `["delever", caller: Address, collateral_asset: Address, borrow_asset: Address]`
    /// - data - `[collateral_withdrawn: i128, borrow_received: i128, repaid: i128]`
    pub fn delever(
        e: &Env,
        caller: Address,
        collateral_asset: Address,
        borrow_asset: Address,
        collateral_withdrawn: i128,
        borrow_received: i128,
        repaid: i128,
    ) {
        let topics = (Symbol::new(e, "delever"), caller, collateral_asset, borrow_asset);
        e.events()
            .publish(topics, (collateral_withdrawn, borrow_received, repaid));
    }

    /// Emitted when a redemption repays debt out of collateral
    ///
    /// - topics - `["debt_resolved", borrow_asset: Address]`
    /// - data - `[repaid: i128, collateral_spent: i128, rounds: u32]`
    pub fn debt_resolved(
        e: &Env,
        borrow_asset: Address,
        repaid: i128,
        collateral_spent: i128,
        rounds: u32,
    ) {
        let topics = (Symbol::new(e, "debt_resolved"), borrow_asset);
        e.events().publish(topics, (repaid, collateral_spent, rounds));
    }

    /// Emitted when the streaming fee is accrued
    ///
    /// - topics - `["fee_accrued", fee_recipient: Address]`
    /// - data - `[minted: i128, position_multiplier: i128]`
    pub fn fee_accrued(e: &Env, fee_recipient: Address, minted: i128, position_multiplier: i128) {
        let topics = (Symbol::new(e, "fee_accrued"), fee_recipient);
        e.events().publish(topics, (minted, position_multiplier));
    }

    /// - topics - `["streaming_fee_updated", manager: Address]`
    /// - data - `streaming_fee_percentage: i128`
    pub fn streaming_fee_updated(e: &Env, manager: Address, streaming_fee_percentage: i128) {
        let topics = (Symbol::new(e, "streaming_fee_updated"), manager);
        e.events().publish(topics, streaming_fee_percentage);
    }

    /// - topics - `["fee_recipient_updated", manager: Address]`
    /// - data - `fee_recipient: Address`
    pub fn fee_recipient_updated(e: &Env, manager: Address, fee_recipient: Address) {
        let topics = (Symbol::new(e, "fee_recipient_updated"), manager);
        e.events().publish(topics, fee_recipient);
    }

    /// - topics - `["any_bot_allowed_updated", manager: Address]`
    /// - data - `allowed: bool`
    pub fn any_bot_allowed_updated(e: &Env, manager: Address, allowed: bool) {
        let topics = (Symbol::new(e, "any_bot_allowed_updated"), manager);
        e.events().publish(topics, allowed);
    }

    /// - topics - `["caller_permission_updated", caller: Address]`
    /// - data - `allowed: bool`
    pub fn caller_permission_updated(e: &Env, caller: Address, allowed: bool) {
        let topics = (Symbol::new(e, "caller_permission_updated"), caller);
        e.events().publish(topics, allowed);
    }

    /// - topics - `["enabled_assets_updated", manager: Address]`
    /// - data - `[added: Vec<Address>, removed: Vec<Address>]`
    pub fn enabled_assets_updated(
        e: &Env,
        manager: Address,
        added: Vec<Address>,
        removed: Vec<Address>,
    ) {
        let topics = (Symbol::new(e, "enabled_assets_updated"), manager);
        e.events().publish(topics, (added, removed));
    }

    /// - topics - `["swap_venue_updated", venue: SwapVenue]`
    /// - data - `router: Address`
    pub fn swap_venue_updated(e: &Env, venue: SwapVenue, router: Address) {
        let topics = (Symbol::new(e, "swap_venue_updated"), venue);
        e.events().publish(topics, router);
    }

    /// - topics - `["manager_updated", previous: Address]`
    /// - data - `manager: Address`
    pub fn manager_updated(e: &Env, previous: Address, manager: Address) {
        let topics = (Symbol::new(e, "manager_updated"), previous);
        e.events().publish(topics, manager);
    }
}
