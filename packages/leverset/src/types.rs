use soroban_sdk::contracttype;

/// Swap venues an index can route through. Each venue resolves to a router
/// contract implementing [`crate::interfaces::swap_router::SwapRouter`].
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapVenue {
    Soroswap,
    Aquarius,
    Phoenix,
}
