pub mod fee;
pub mod index;
pub mod issuance;
pub mod leverage;
