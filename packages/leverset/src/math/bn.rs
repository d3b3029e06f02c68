//! Big number types

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use uint::construct_uint;

use crate::error::{ErrorCode, LeverResult};

construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

impl U256 {
    /// Convert to i128, failing if the value needs more than 127 bits.
    pub fn try_to_i128(self) -> LeverResult<i128> {
        if self.bits() > 127 {
            return Err(ErrorCode::BnConversionError);
        }
        Ok(self.low_u128() as i128)
    }

    pub fn try_from_i128(value: i128) -> LeverResult<U256> {
        if value < 0 {
            return Err(ErrorCode::BnConversionError);
        }
        Ok(U256::from(value as u128))
    }
}

#[cfg(test)]
mod test {
    use super::U256;
    use crate::error::ErrorCode;

    #[test]
    fn round_trips_through_i128() {
        let value = U256::try_from_i128(1_000_000_000_000_000_000_000).unwrap();
        assert_eq!(value.try_to_i128().unwrap(), 1_000_000_000_000_000_000_000);
        assert_eq!(U256::try_from_i128(i128::MAX).unwrap().try_to_i128().unwrap(), i128::MAX);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(U256::try_from_i128(-1), Err(ErrorCode::BnConversionError));

        let too_big = U256::from(u128::MAX);
        assert_eq!(too_big.try_to_i128(), Err(ErrorCode::BnConversionError));
    }
}
