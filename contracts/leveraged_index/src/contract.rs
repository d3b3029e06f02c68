use leverset::{
    constants::{MAX_BPS, WAD_DECIMALS},
    error::{ErrorCode, LeverResult},
    types::SwapVenue,
    validate,
};
use soroban_sdk::{
    contract, contractimpl, contractmeta, log, panic_with_error,
    token::{self, Interface as _},
    vec, Address, Env, String, Vec,
};
use soroban_token_sdk::{metadata::TokenMetadata, TokenUtils};

use crate::{
    allowance::{read_allowance, spend_allowance, write_allowance},
    balance::{read_balance, receive_balance, spend_balance},
    controller::{fee, issuance, leverage, sync_components, validate_tracked_asset},
    events::LeveragedIndexEvents,
    gateway::{lending::LendingGateway, token as underlying},
    interface::leveraged_index::LeveragedIndexTrait,
    ledger::PositionLedger,
    metadata::{read_decimal, read_name, read_symbol, write_metadata},
    state::{
        fee::{FeeConfig, FeeParams},
        index::{IndexState, PositionModule},
        issuance::{IssueOutcome, RedeemOutcome},
        leverage::{
            AssetPair, DeleverOutcome, LeverOutcome, LeverageConfig, LeverageParams, PairState,
        },
    },
    storage::{
        bump_instance, get_caller_permission, get_collateral_asset, get_fee_config,
        get_index, get_leverage_config, get_manager, get_pair_state, get_swap_venue,
        has_fee_config, has_leverage_config, save_caller_permission, save_collateral_asset,
        save_fee_config, save_index, save_lending_pool, save_leverage_config, save_manager,
        save_swap_venue,
    },
    transaction::atomically,
};

contractmeta!(
    key = "Description",
    val = "Leveraged index token backed by a lending pool position"
);

fn require_manager(env: &Env, sender: &Address) -> LeverResult {
    sender.require_auth();
    validate!(
        env,
        *sender == get_manager(env),
        ErrorCode::Unauthorized,
        "Leveraged Index: sender is not the manager"
    )
}

fn check_nonnegative_amount(env: &Env, amount: i128) {
    if amount < 0 {
        log!(env, "Leveraged Index: negative amount is not allowed");
        panic_with_error!(env, ErrorCode::InvalidAmount)
    }
}

fn or_panic<T>(env: &Env, result: LeverResult<T>) -> T {
    result.unwrap_or_else(|error_code| panic_with_error!(env, error_code))
}

#[contract]
pub struct LeveragedIndex;

#[contractimpl]
impl LeveragedIndex {
    pub fn __constructor(
        env: Env,
        manager: Address,
        lending_pool: Address,
        collateral_asset: Address,
        name: String,
        symbol: String,
    ) {
        save_manager(&env, &manager);
        save_lending_pool(&env, &lending_pool);
        save_collateral_asset(&env, &collateral_asset);
        save_index(&env, &IndexState::new(&env, collateral_asset.clone()));

        write_metadata(
            &env,
            TokenMetadata {
                decimal: WAD_DECIMALS,
                name: name.clone(),
                symbol: symbol.clone(),
            },
        );

        // fails early on an address that is not a token
        underlying::decimals(&env, &collateral_asset);

        LeveragedIndexEvents::initialize(&env, manager, collateral_asset, name, symbol);
    }
}

#[contractimpl]
impl LeveragedIndexTrait for LeveragedIndex {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize_leverage(
        env: Env,
        sender: Address,
        params: LeverageParams,
    ) -> Result<LeverageConfig, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        validate!(
            &env,
            !has_leverage_config(&env),
            ErrorCode::AlreadyInitialized,
            "Leveraged Index: leverage config already set"
        )?;

        let collateral_asset = get_collateral_asset(&env);
        validate!(
            &env,
            params.borrow_asset != collateral_asset,
            ErrorCode::BorrowNotEnabled,
            "Leveraged Index: borrow asset must differ from the collateral"
        )?;
        validate!(
            &env,
            params.max_slippage_bps < MAX_BPS,
            ErrorCode::InvalidAmount,
            "Leveraged Index: max slippage must be below 100%"
        )?;

        underlying::decimals(&env, &params.borrow_asset);
        underlying::decimals(&env, &params.quote_asset);

        let config = LeverageConfig {
            collateral_asset: collateral_asset.clone(),
            borrow_asset: params.borrow_asset.clone(),
            quote_asset: params.quote_asset,
            enabled_assets: vec![
                &env,
                AssetPair {
                    collateral: collateral_asset,
                    borrow: params.borrow_asset,
                },
            ],
            any_bot_allowed: false,
            default_venue: params.default_venue,
            max_slippage_bps: params.max_slippage_bps,
        };
        save_leverage_config(&env, &config);

        LeveragedIndexEvents::leverage_initialized(&env, sender, config.clone());
        Ok(config)
    }

    fn initialize_fee(
        env: Env,
        sender: Address,
        params: FeeParams,
    ) -> Result<FeeConfig, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        validate!(
            &env,
            !has_fee_config(&env),
            ErrorCode::AlreadyInitialized,
            "Leveraged Index: fee config already set"
        )?;
        fee::validate_fee_params(&env, &params)?;

        let config = FeeConfig {
            fee_recipient: params.fee_recipient,
            streaming_fee_percentage: params.streaming_fee_percentage,
            max_streaming_fee_percentage: params.max_streaming_fee_percentage,
            last_accrual_timestamp: env.ledger().timestamp(),
        };
        save_fee_config(&env, &config);

        LeveragedIndexEvents::fee_initialized(
            &env,
            sender,
            config.fee_recipient.clone(),
            config.streaming_fee_percentage,
        );
        Ok(config)
    }

    fn update_manager(env: Env, sender: Address, manager: Address) -> Result<(), ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        save_manager(&env, &manager);
        LeveragedIndexEvents::manager_updated(&env, sender, manager);
        Ok(())
    }

    fn set_swap_venue(
        env: Env,
        sender: Address,
        venue: SwapVenue,
        router: Address,
    ) -> Result<(), ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        save_swap_venue(&env, venue, &router);
        LeveragedIndexEvents::swap_venue_updated(&env, venue, router);
        Ok(())
    }

    fn update_enabled_assets(
        env: Env,
        sender: Address,
        to_add: Vec<Address>,
        to_remove: Vec<Address>,
    ) -> Result<LeverageConfig, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        let config = atomically(&env, |_| {
            leverage::update_enabled_assets(&env, &to_add, &to_remove)
        })?;

        LeveragedIndexEvents::enabled_assets_updated(&env, sender, to_add, to_remove);
        Ok(config)
    }

    fn update_any_bot_allowed(env: Env, sender: Address, allowed: bool) -> Result<(), ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        let mut config = get_leverage_config(&env)?;
        config.any_bot_allowed = allowed;
        save_leverage_config(&env, &config);

        LeveragedIndexEvents::any_bot_allowed_updated(&env, sender, allowed);
        Ok(())
    }

    fn set_caller_permission(
        env: Env,
        sender: Address,
        caller: Address,
        allowed: bool,
    ) -> Result<(), ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        save_caller_permission(&env, &caller, allowed);
        LeveragedIndexEvents::caller_permission_updated(&env, caller, allowed);
        Ok(())
    }

    fn update_streaming_fee(
        env: Env,
        sender: Address,
        streaming_fee_percentage: i128,
    ) -> Result<FeeConfig, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        let config = atomically(&env, |ledger| {
            fee::update_streaming_fee(&env, ledger, streaming_fee_percentage)
        })?;

        LeveragedIndexEvents::streaming_fee_updated(&env, sender, streaming_fee_percentage);
        Ok(config)
    }

    fn update_fee_recipient(
        env: Env,
        sender: Address,
        fee_recipient: Address,
    ) -> Result<FeeConfig, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        let config = fee::update_fee_recipient(&env, fee_recipient.clone())?;
        LeveragedIndexEvents::fee_recipient_updated(&env, sender, fee_recipient);
        Ok(config)
    }

    fn lever(
        env: Env,
        sender: Address,
        borrow_asset: Address,
        collateral_asset: Address,
        borrow_quantity_units: i128,
        min_receive_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<LeverOutcome, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        atomically(&env, |ledger| {
            leverage::lever(
                &env,
                ledger,
                &sender,
                &borrow_asset,
                &collateral_asset,
                borrow_quantity_units,
                min_receive_quantity_units,
                venue,
                &hops,
            )
        })
    }

    fn delever(
        env: Env,
        sender: Address,
        collateral_asset: Address,
        borrow_asset: Address,
        redeem_quantity_units: i128,
        min_repay_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<DeleverOutcome, ErrorCode> {
        require_manager(&env, &sender)?;
        bump_instance(&env);

        atomically(&env, |ledger| {
            leverage::delever(
                &env,
                ledger,
                &sender,
                &collateral_asset,
                &borrow_asset,
                redeem_quantity_units,
                min_repay_quantity_units,
                venue,
                &hops,
            )
        })
    }

    // ################################################################
    //                             KEEPER
    // ################################################################

    fn auto_lever(
        env: Env,
        caller: Address,
        borrow_asset: Address,
        collateral_asset: Address,
        borrow_quantity_units: i128,
        min_receive_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<LeverOutcome, ErrorCode> {
        caller.require_auth();
        bump_instance(&env);

        leverage::validate_bot(&env, &get_leverage_config(&env)?, &caller)?;

        atomically(&env, |ledger| {
            leverage::lever(
                &env,
                ledger,
                &caller,
                &borrow_asset,
                &collateral_asset,
                borrow_quantity_units,
                min_receive_quantity_units,
                venue,
                &hops,
            )
        })
    }

    fn auto_delever(
        env: Env,
        caller: Address,
        collateral_asset: Address,
        borrow_asset: Address,
        redeem_quantity_units: i128,
        min_repay_quantity_units: i128,
        venue: SwapVenue,
        hops: Vec<Address>,
    ) -> Result<DeleverOutcome, ErrorCode> {
        caller.require_auth();
        bump_instance(&env);

        leverage::validate_bot(&env, &get_leverage_config(&env)?, &caller)?;

        atomically(&env, |ledger| {
            leverage::delever(
                &env,
                ledger,
                &caller,
                &collateral_asset,
                &borrow_asset,
                redeem_quantity_units,
                min_repay_quantity_units,
                venue,
                &hops,
            )
        })
    }

    fn accrue_fee(env: Env) -> Result<i128, ErrorCode> {
        bump_instance(&env);
        atomically(&env, |ledger| fee::accrue_fee(&env, ledger))
    }

    fn sync(env: Env, asset: Address) -> Result<(), ErrorCode> {
        bump_instance(&env);
        atomically(&env, |ledger| {
            validate_tracked_asset(&env, ledger, &asset)?;
            ledger.sync(&env, &LendingGateway::new(&env), &asset)
        })
    }

    // ################################################################
    //                             USER
    // ################################################################

    fn issue(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        max_cost: i128,
    ) -> Result<IssueOutcome, ErrorCode> {
        sender.require_auth();
        bump_instance(&env);

        atomically(&env, |ledger| {
            issuance::issue(&env, ledger, &sender, &to, quantity, max_cost)
        })
    }

    fn issue_with_quote(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        max_quote_in: i128,
    ) -> Result<IssueOutcome, ErrorCode> {
        sender.require_auth();
        bump_instance(&env);

        atomically(&env, |ledger| {
            issuance::issue_with_quote(&env, ledger, &sender, &to, quantity, max_quote_in)
        })
    }

    fn redeem(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        min_received: i128,
    ) -> Result<RedeemOutcome, ErrorCode> {
        sender.require_auth();
        bump_instance(&env);

        atomically(&env, |ledger| {
            issuance::redeem(&env, ledger, &sender, &to, quantity, min_received)
        })
    }

    fn redeem_to_quote(
        env: Env,
        sender: Address,
        quantity: i128,
        to: Address,
        min_quote_out: i128,
    ) -> Result<RedeemOutcome, ErrorCode> {
        sender.require_auth();
        bump_instance(&env);

        atomically(&env, |ledger| {
            issuance::redeem_to_quote(&env, ledger, &sender, &to, quantity, min_quote_out)
        })
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_manager(env: Env) -> Address {
        get_manager(&env)
    }

    fn query_index(env: Env) -> IndexState {
        get_index(&env)
    }

    fn query_leverage_config(env: Env) -> Result<LeverageConfig, ErrorCode> {
        get_leverage_config(&env)
    }

    fn query_fee_config(env: Env) -> Result<FeeConfig, ErrorCode> {
        get_fee_config(&env)
    }

    fn query_pending_fee(env: Env) -> Result<i128, ErrorCode> {
        let config = get_fee_config(&env)?;
        fee::calculate_fee_percentage(&env, &config, env.ledger().timestamp())
    }

    fn query_pair_state(env: Env, collateral_asset: Address, borrow_asset: Address) -> PairState {
        get_pair_state(
            &env,
            &AssetPair {
                collateral: collateral_asset,
                borrow: borrow_asset,
            },
        )
    }

    fn query_caller_permission(env: Env, caller: Address) -> bool {
        get_caller_permission(&env, &caller)
    }

    fn query_swap_venue(env: Env, venue: SwapVenue) -> Option<Address> {
        get_swap_venue(&env, venue)
    }

    fn total_supply(env: Env) -> i128 {
        get_index(&env).total_supply
    }

    fn position_multiplier(env: Env) -> i128 {
        get_index(&env).position_multiplier
    }

    fn get_default_unit(env: Env, asset: Address) -> Result<i128, ErrorCode> {
        PositionLedger::load(&env).get_default_unit(&env, &asset)
    }

    fn get_external_unit(
        env: Env,
        module: PositionModule,
        asset: Address,
    ) -> Result<i128, ErrorCode> {
        PositionLedger::load(&env).get_external_unit(&env, module, &asset)
    }
}

// ################################################################
//                          SHARE TOKEN
// ################################################################

#[contractimpl]
impl token::Interface for LeveragedIndex {
    fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        bump_instance(&env);
        read_allowance(&env, from, spender).amount
    }

    fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        check_nonnegative_amount(&env, amount);
        bump_instance(&env);

        or_panic(
            &env,
            write_allowance(&env, from.clone(), spender.clone(), amount, expiration_ledger),
        );
        TokenUtils::new(&env)
            .events()
            .approve(from, spender, amount, expiration_ledger);
    }

    fn balance(env: Env, id: Address) -> i128 {
        bump_instance(&env);
        read_balance(&env, &id)
    }

    fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        check_nonnegative_amount(&env, amount);
        bump_instance(&env);

        or_panic(&env, spend_balance(&env, &from, amount));
        or_panic(&env, receive_balance(&env, &to, amount));
        TokenUtils::new(&env).events().transfer(from, to, amount);
    }

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        check_nonnegative_amount(&env, amount);
        bump_instance(&env);

        or_panic(&env, spend_allowance(&env, from.clone(), spender, amount));
        or_panic(&env, spend_balance(&env, &from, amount));
        or_panic(&env, receive_balance(&env, &to, amount));
        TokenUtils::new(&env).events().transfer(from, to, amount);
    }

    fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        check_nonnegative_amount(&env, amount);
        bump_instance(&env);

        or_panic(&env, burn_shares(&env, &from, amount));
    }

    fn burn_from(env: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        check_nonnegative_amount(&env, amount);
        bump_instance(&env);

        or_panic(&env, spend_allowance(&env, from.clone(), spender, amount));
        or_panic(&env, burn_shares(&env, &from, amount));
    }

    fn decimals(env: Env) -> u32 {
        read_decimal(&env)
    }

    fn name(env: Env) -> String {
        read_name(&env)
    }

    fn symbol(env: Env) -> String {
        read_symbol(&env)
    }
}

/// Burns shares without touching the underlying position, so the remaining
/// holders absorb the burned claim through re-synced units.
fn burn_shares(env: &Env, from: &Address, amount: i128) -> LeverResult {
    atomically(env, |ledger| {
        ledger.burn(env, from, amount)?;
        sync_components(env, ledger, &LendingGateway::new(env))
    })
}

