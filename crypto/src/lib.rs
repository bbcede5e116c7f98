//! Thin bindings to the cryptographic primitives the session protocol is
//! built from: SHA-256, HMAC-SHA256, AES-128-CTR with a little-endian
//! counter, classic Diffie-Hellman, and RSA-PSS/SHA-256 verification.
//!
//! Nothing in this crate knows about handshakes, records, or commands —
//! that belongs to `keyderiv`, `codec` and `session`.

mod aes_ctr;
mod dh;
mod error;
mod hash;
mod rsa_pss;

pub use aes_ctr::{aes128_ctr_xor, AesCtrState};
pub use dh::{dh_compute_secret, dh_generate};
pub use error::CryptoError;
pub use hash::{hmac_sha256, sha256, tags_equal};
pub use rsa_pss::rsa_verify_pss_sha256;
