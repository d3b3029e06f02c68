//! Boundary with the token, lending and swap contracts. Everything above this
//! layer speaks WAD amounts; native token amounts never leave it.

pub mod lending;
pub mod swap;
pub mod token;
