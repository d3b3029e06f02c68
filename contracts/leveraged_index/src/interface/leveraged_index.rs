use leverset::{error::ErrorCode, types::SwapVenue};
use soroban_sdk::{Address, Env, Vec};

use crate::state::{
    fee::{FeeConfig, FeeParams},
    index::{IndexState, PositionModule},
    issuance::{IssueOutcome, RedeemOutcome},
    leverage::{DeleverOutcome, LeverOutcome, LeverageConfig, LeverageParams, PairState},
};

pub trait LeveragedIndexTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize_leverage(
        env: Env,
        sender: Address,
        params: LeverageParams,
    ) -> Result<LeverageConfig, ErrorCode>;

    fn initialize_fee(env: Env, sender: Address, params: FeeParams)
        -> Result<FeeConfig, ErrorCode>;

    fn update_manager(env: Env, sender: Address, manager: Address) -> Result<(), ErrorCode>;

    fn set_swap_venue(
        env: Env,
        sender: Address,
        venue: SwapVenue,
        router: Address,
    ) -> Result<(), ErrorCode>;

    fn update_enabled_assets(
        env: Env,
        sender: Address,
        to_add: Vec<Address>,
        to_remove: Vec<Address>,
    ) -> Result<LeverageConfig, ErrorCode>;

    fn update_any_bot_allowed(env: Env, sender: Address, allowed: bool) -> Result<(), ErrorCode>;

    fn set_caller_permission(
        env: Env,
        sender: Address,
        caller: Address,
        allowed: bool,
    ) -> Result<(), ErrorCode>;

    fn update_streaming_fee(
        env: Env,
        sender: Address,
        streaming_fee_percentage: i128,
    ) -> Result<FeeConfig, ErrorCode>;

    fn update_fee_recipient(
        env: Env,
        sender: Address,
        fee_recipient: Address,
    ) -> Result<FeeConfig, ErrorCode>;

    #[allow(clippy::too_many_arguments)]
    fn lever(
        env: Env,
        sender: Address,
        borrow_asset: Address,
        collateral_asset: Address,
        borrow_quantity_units: i128,
        min_receive_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<LeverOutcome, ErrorCode>;

    #[allow(clippy::too_many_arguments)]
    fn delever(
        env: Env,
        sender: Address,
        collateral_asset: Address,
        borrow_asset: Address,
        redeem_quantity_units: i128,
        min_repay_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<DeleverOutcome, ErrorCode>;

    // ################################################################
    //                             KEEPER
    // ################################################################

    #[allow(clippy::too_many_arguments)]
    fn auto_lever(
        env: Env,
        caller: Address,
        borrow_asset: Address,
        collateral_asset: Address,
        borrow_quantity_units: i128,
        min_receive_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<LeverOutcome, ErrorCode>;

    #[allow(clippy::too_many_arguments)]
    fn auto_delever(
        env: Env,
        caller: Address,
        collateral_asset: Address,
        borrow_asset: Address,
        redeem_quantity_units: i128,
        min_repay_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<DeleverOutcome, ErrorCode>;

    fn accrue_fee(env: Env) -> Result<i128, ErrorCode>;

    fn sync(env: Env, asset: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                             USER
    // ################################################################

    fn issue(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        max_cost: i128,
    ) -> Result<IssueOutcome, ErrorCode>;

    fn issue_with_quote(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        max_quote_in: i128,
    ) -> Result<IssueOutcome, ErrorCode>;

    fn redeem(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        min_received: i128,
    ) -> Result<RedeemOutcome, ErrorCode>;

    fn redeem_to_quote(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        min_quote_out: i128,
    ) -> Result<RedeemOutcome, ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_manager(env: Env) -> Address;

    fn query_index(env: Env) -> IndexState;

    fn query_leverage_config(env: Env) -> Result<LeverageConfig, ErrorCode>;

    fn query_fee_config(env: Env) -> Result<FeeConfig, ErrorCode>;

    fn query_pending_fee(env: Env) -> Result<i128, ErrorCode>;

    fn query_pair_state(env: Env, collateral_asset: Address, borrow_asset: Address) -> PairState;

    fn query_caller_permission(env: Env, caller: Address) -> bool;

    fn query_swap_venue(env: Env, venue: SwapVenue) -> Option<Address>;

    fn total_supply(env: Env) -> i128;

    fn position_multiplier(env: Env) -> i128;

    fn get_default_unit(env: Env, asset: Address) -> Result<i128, ErrorCode>;

    fn get_external_unit(
        env: Env,
        module: PositionModule,
        asset: Address,
    ) -> Result<i128, ErrorCode>;
}
