use soroban_sdk::{log, Env};

use crate::{
    constants::WAD,
    error::{ErrorCode, LeverResult},
    math::{bn::U256, safe_math::SafeMath},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rounding {
    Down,
    Up,
}

/// `a * b / denominator` rounded down. Operands must be non-negative and the
/// denominator positive; the product is widened to 256 bits when it does not
/// fit in an i128.
pub fn mul_div_floor(env: &Env, a: i128, b: i128, denominator: i128) -> LeverResult<i128> {
    mul_div(env, a, b, denominator, Rounding::Down)
}

/// `a * b / denominator` rounded up.
pub fn mul_div_ceil(env: &Env, a: i128, b: i128, denominator: i128) -> LeverResult<i128> {
    mul_div(env, a, b, denominator, Rounding::Up)
}

fn mul_div(
    env: &Env,
    a: i128,
    b: i128,
    denominator: i128,
    rounding: Rounding,
) -> LeverResult<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        log!(env, "Math error: mul_div operands out of range");
        return Err(ErrorCode::MathError);
    }

    if let Some(product) = a.checked_mul(b) {
        return match rounding {
            Rounding::Down => product.safe_div(denominator, env),
            Rounding::Up => product.safe_div_ceil(denominator, env),
        };
    }

    let product = U256::try_from_i128(a)? * U256::try_from_i128(b)?;
    let denominator = U256::try_from_i128(denominator)?;

    let mut quotient = product / denominator;
    if rounding == Rounding::Up && !(product % denominator).is_zero() {
        quotient = quotient + U256::one();
    }

    quotient.try_to_i128().map_err(|error_code| {
        log!(env, "Math error: mul_div result does not fit in i128");
        error_code
    })
}

pub fn wad_mul(env: &Env, a: i128, b: i128) -> LeverResult<i128> {
    mul_div_floor(env, a, b, WAD)
}

pub fn wad_mul_ceil(env: &Env, a: i128, b: i128) -> LeverResult<i128> {
    mul_div_ceil(env, a, b, WAD)
}

pub fn wad_div(env: &Env, a: i128, b: i128) -> LeverResult<i128> {
    mul_div_floor(env, a, WAD, b)
}

pub fn wad_div_ceil(env: &Env, a: i128, b: i128) -> LeverResult<i128> {
    mul_div_ceil(env, a, WAD, b)
}
