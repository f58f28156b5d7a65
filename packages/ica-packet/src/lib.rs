#![doc = include_str!("../README.md")]
#![deny(missing_docs, unused_crate_dependencies)]
#![warn(clippy::nursery, clippy::pedantic)]

/// Ensure that a condition is true, otherwise return an error.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub mod encoding;
pub mod error;
pub mod message;
pub mod packet;
pub mod registry;
pub mod serde;
pub mod types;

pub use encoding::TxEncoding;
pub use error::CodecError;
pub use message::IcaMessage;
pub use packet::{IcaPacketData, MAX_MEMO_CHAR_LENGTH};
pub use registry::TypeRegistry;
