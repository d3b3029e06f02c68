//! Conversion between WAD amounts and native token amounts.

use soroban_sdk::Env;

use crate::{
    constants::WAD_DECIMALS,
    error::{ErrorCode, LeverResult},
    math::safe_math::SafeMath,
    validate,
};

/// Number of native units of a `decimals` token in one WAD unit step.
pub fn wad_scale(env: &Env, decimals: u32) -> LeverResult<i128> {
    validate!(
        env,
        decimals <= WAD_DECIMALS,
        ErrorCode::InvalidAmount,
        "Decimals: tokens with more than 18 decimals are not supported"
    )?;
    Ok(10_i128.pow(WAD_DECIMALS - decimals))
}

pub fn to_wad(env: &Env, amount: i128, decimals: u32) -> LeverResult<i128> {
    amount.safe_mul(wad_scale(env, decimals)?, env)
}

/// Used for amounts leaving the index.
pub fn from_wad_floor(env: &Env, amount: i128, decimals: u32) -> LeverResult<i128> {
    amount.safe_div(wad_scale(env, decimals)?, env)
}

/// Used for amounts the index must receive in full.
pub fn from_wad_ceil(env: &Env, amount: i128, decimals: u32) -> LeverResult<i128> {
    amount.safe_div_ceil(wad_scale(env, decimals)?, env)
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;

    use super::*;
    use crate::constants::WAD;

    #[test]
    fn seven_decimal_token() {
        let env = Env::default();

        assert_eq!(to_wad(&env, 10_000_000, 7).unwrap(), WAD);
        assert_eq!(from_wad_floor(&env, WAD + 1, 7).unwrap(), 10_000_000);
        assert_eq!(from_wad_ceil(&env, WAD + 1, 7).unwrap(), 10_000_001);
    }

    #[test]
    fn eighteen_decimal_token_is_identity() {
        let env = Env::default();

        assert_eq!(to_wad(&env, 123, 18).unwrap(), 123);
        assert_eq!(from_wad_ceil(&env, 123, 18).unwrap(), 123);
    }

    #[test]
    fn rejects_wide_tokens() {
        let env = Env::default();

        assert_eq!(wad_scale(&env, 19), Err(ErrorCode::InvalidAmount));
    }
}
