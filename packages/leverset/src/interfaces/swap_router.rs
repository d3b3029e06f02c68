use soroban_sdk::{contractclient, Address, Env, Vec};

/// Swap venue consumed by the index. `path` lists the assets from input to
/// output. `to` funds the input through an allowance granted to the router
/// and receives the output.
#[contractclient(name = "SwapRouterClient")]
pub trait SwapRouter {
    fn quote_out(env: Env, path: Vec<Address>, amount_in: i128) -> i128;

    fn swap_exact_in(
        env: Env,
        path: Vec<Address>,
        amount_in: i128,
        min_out: i128,
        to: Address,
        deadline: u64,
    ) -> i128;

    fn swap_for_exact_out(
        env: Env,
        path: Vec<Address>,
        amount_out: i128,
        max_in: i128,
        to: Address,
        deadline: u64,
    ) -> i128;
}
