extern crate std;

mod bots;
mod fee;
mod leverage;
mod token;
