#![no_std]

mod allowance;
mod balance;
pub mod contract;
mod controller;
mod events;
mod gateway;
pub mod interface;
mod ledger;
mod metadata;
pub mod state;
mod storage;
mod transaction;

#[cfg(test)]
mod tests;
