//! IBC entry points and the ICS-27 types they exchange with the host.

pub mod handshake;
pub mod metadata;
pub mod relay;
pub mod types;
