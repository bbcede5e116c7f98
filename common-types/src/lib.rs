//! Shared value types passed between the crypto, codec and session crates.

mod command;
mod dh_group;
mod rsa_key;

pub use command::{Command, CommandError, Message};
pub use dh_group::DhGroup;
pub use rsa_key::RsaPublicKeyDer;
