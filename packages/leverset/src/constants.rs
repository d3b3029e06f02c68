// ################################################################
//                             TTL
// ################################################################

pub const DAY_IN_LEDGERS: u32 = 17280;

pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const BALANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

// ################################################################
//                           PRECISION
// ################################################################

/// Fixed point scale of every unit, share amount and fee percentage.
pub const WAD: i128 = 1_000_000_000_000_000_000;
pub const WAD_DECIMALS: u32 = 18;

pub const BPS_DENOMINATOR: i128 = 10_000;
pub const MAX_BPS: u32 = 10_000;

// ################################################################
//                             TIME
// ################################################################

/// 365.25 days
pub const ONE_YEAR_IN_SECONDS: u64 = 31_557_600;

/// Validity window handed to swap venues, in seconds.
pub const SWAP_DEADLINE_WINDOW: u64 = 300;

// ################################################################
//                           LEVERAGE
// ################################################################

/// Upper bound on withdraw/swap/repay rounds while resolving debt on redeem.
pub const MAX_DELEVER_ITERATIONS: u32 = 16;

pub const DEFAULT_REFERRAL_CODE: u32 = 0;
