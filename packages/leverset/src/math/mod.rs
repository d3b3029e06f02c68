pub mod bn;
pub mod decimals;
pub mod safe_math;
pub mod wad;
