//! In-memory lending pool and swap router used to exercise contracts that
//! consume [`crate::interfaces`]. Both hold real token balances, so tests
//! must fund them with liquidity.

pub mod lending_pool;
pub mod swap_router;

pub use lending_pool::{MockLendingPool, MockLendingPoolClient, Reserve};
pub use swap_router::{MockSwapRouter, MockSwapRouterClient};
