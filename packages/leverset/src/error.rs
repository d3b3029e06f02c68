use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    #[doc = "Contract or config already initialized"]
    AlreadyInitialized = 1,
    #[doc = "Index not initialized with a leverage and fee config"]
    InvalidState = 2,
    #[doc = "Caller is not allowed to perform the operation"]
    Unauthorized = 3,
    #[doc = "Borrow asset pair was never enabled"]
    BorrowNotEnabled = 4,
    #[doc = "Collateral asset does not belong to the index"]
    CollateralNotEnabled = 5,
    #[doc = "Realized cost above the caller supplied ceiling"]
    SlippageExceeded = 6,
    #[doc = "Realized proceeds below the caller supplied floor"]
    SlippageBelowMinimum = 7,
    #[doc = "Not enough index shares"]
    InsufficientBalance = 8,
    #[doc = "Not enough allowance"]
    InsufficientAllowance = 9,
    InvalidAmount = 10,
    InvalidFee = 11,
    #[doc = "Another mutating operation holds the index lock"]
    OperationInProgress = 12,
    #[doc = "Debt attributable to the redemption could not be repaid"]
    DeleverNotConverged = 13,
    SwapVenueNotFound = 14,
    #[doc = "Pair still carries debt"]
    OutstandingDebt = 15,
    #[doc = "Lending pool cannot fund the debt carried by new shares"]
    BorrowCapacityExceeded = 16,
    MathError = 17,
    BnConversionError = 18,
}

pub type LeverResult<T = ()> = core::result::Result<T, ErrorCode>;
