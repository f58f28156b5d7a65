#![doc = include_str!("../README.md")]
#![deny(missing_docs, unused_crate_dependencies)]
#![warn(clippy::nursery, clippy::pedantic)]

pub mod callbacks;
pub mod contract;
pub mod cosmos_msg;
pub mod error;
pub mod events;
pub mod execute;
pub mod helpers;
pub mod ibc;
pub mod instantiate;
pub mod msg;
pub mod ownership;
pub mod query;
pub mod state;

#[cfg(test)]
pub mod test;

pub use error::ContractError;
