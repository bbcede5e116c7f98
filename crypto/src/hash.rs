use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

/// `sha256(bytes) -> 32-byte digest`.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// `hmac_sha256(key, message) -> 32-byte tag`, single-shot.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Constant-time comparison of a computed tag against one received on the
/// wire. Used for every MAC check in the record layer so that tag mismatches
/// never leak timing information about where the first differing byte is.
pub fn tags_equal(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;

    a.ct_eq(b).into()
}
