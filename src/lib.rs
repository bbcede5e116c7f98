//! Uniqush wire-level session protocol: a DH + RSA-PSS handshake followed
//! by a duplex stream of encrypted, authenticated commands.
//!
//! This crate is a thin public facade over the workspace's path crates;
//! the state machine itself lives in [`session`], the framing in
//! [`codec`], and the primitives in [`crypto`]/[`keyderiv`]. Callers
//! drive I/O themselves — every operation here is buffer-in, buffer-out,
//! so the protocol can sit over a blocking socket, an async stream, or a
//! test harness with equal ease.

pub use codec::CodecError;
pub use common_types::{Command, CommandError, DhGroup, Message, RsaPublicKeyDer};
pub use crypto::CryptoError;
pub use session::{Phase, Session, SessionError, CURRENT_PROTOCOL_VERSION};
