use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueOutcome {
    pub quantity: i128,
    /// Collateral (or quote asset) paid by the issuer
    pub cost: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemOutcome {
    pub quantity: i128,
    /// Collateral (or quote asset) sent to the recipient
    pub received: i128,
    pub debt_repaid: i128,
}

/// Debt a new issuance takes on in one borrow asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtLeg {
    pub asset: Address,
    /// Share of the outstanding debt carried by the new shares
    pub borrow_amount: i128,
    /// Part of the borrow sold for collateral; the rest backs the idle units
    pub swap_amount: i128,
    pub expected_collateral: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetAmount {
    pub asset: Address,
    pub amount: i128,
}
