use soroban_sdk::Env;

use crate::error::LeverResult;

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self, env: &Env) -> LeverResult<Self>;
    fn safe_sub(self, rhs: Self, env: &Env) -> LeverResult<Self>;
    fn safe_mul(self, rhs: Self, env: &Env) -> LeverResult<Self>;
    fn safe_div(self, rhs: Self, env: &Env) -> LeverResult<Self>;
    /// Division rounding away from zero for positive operands.
    fn safe_div_ceil(self, rhs: Self, env: &Env) -> LeverResult<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t, env: &Env) -> LeverResult<$t> {
                self.checked_add(v).ok_or_else(crate::math_error!(env))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t, env: &Env) -> LeverResult<$t> {
                self.checked_sub(v).ok_or_else(crate::math_error!(env))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t, env: &Env) -> LeverResult<$t> {
                self.checked_mul(v).ok_or_else(crate::math_error!(env))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t, env: &Env) -> LeverResult<$t> {
                self.checked_div(v).ok_or_else(crate::math_error!(env))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div_ceil(self, v: $t, env: &Env) -> LeverResult<$t> {
                let quotient = self.safe_div(v, env)?;
                match self.checked_rem(v).ok_or_else(crate::math_error!(env))? {
                    0 => Ok(quotient),
                    _ => quotient.safe_add(1, env),
                }
            }
        }
    };
}

checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);
checked_impl!(i128);

#[cfg(test)]
mod test {
    use crate::error::ErrorCode;
    use crate::math::safe_math::SafeMath;
    use soroban_sdk::Env;

    #[test]
    fn safe_add() {
        let env = Env::default();
        assert_eq!((1_i128).safe_add(1, &env).unwrap(), 2);
        assert_eq!((1_u128).safe_add(u128::MAX, &env), Err(ErrorCode::MathError));
    }

    #[test]
    fn safe_sub() {
        let env = Env::default();
        assert_eq!((1_u128).safe_sub(1, &env).unwrap(), 0);
        assert_eq!((0_u64).safe_sub(1, &env), Err(ErrorCode::MathError));
        assert_eq!((0_i128).safe_sub(1, &env).unwrap(), -1);
    }

    #[test]
    fn safe_mul() {
        let env = Env::default();
        assert_eq!((8_i128).safe_mul(80, &env).unwrap(), 640);
        assert_eq!((2_i128).safe_mul(i128::MAX, &env), Err(ErrorCode::MathError));
    }

    #[test]
    fn safe_div() {
        let env = Env::default();
        assert_eq!((155_i128).safe_div(8, &env).unwrap(), 19);
        assert_eq!((160_u32).safe_div(8, &env).unwrap(), 20);
        assert_eq!((1_i128).safe_div(0, &env), Err(ErrorCode::MathError));
    }

    #[test]
    fn safe_div_ceil() {
        let env = Env::default();
        assert_eq!((155_i128).safe_div_ceil(8, &env).unwrap(), 20);
        assert_eq!((160_i128).safe_div_ceil(8, &env).unwrap(), 20);
        assert_eq!((1_u128).safe_div_ceil(100, &env).unwrap(), 1);
        assert_eq!((0_u64).safe_div_ceil(3, &env).unwrap(), 0);
        assert_eq!((1_i128).safe_div_ceil(0, &env), Err(ErrorCode::MathError));
    }
}
