use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    pub fee_recipient: Address,
    /// Annual rate, WAD (1% = 0.01e18)
    pub streaming_fee_percentage: i128,
    pub max_streaming_fee_percentage: i128,
    pub last_accrual_timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeParams {
    pub fee_recipient: Address,
    pub streaming_fee_percentage: i128,
    pub max_streaming_fee_percentage: i128,
}
