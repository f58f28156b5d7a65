//! Protobuf messages of host chain modules that are not part of the Cosmos SDK
//! or ibc-go proto crates.

pub mod filetree;
