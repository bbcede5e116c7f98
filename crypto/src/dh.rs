use common_types::DhGroup;
use num_bigint::{BigUint, RandBigInt};
use rand::RngCore;

use crate::error::CryptoError;

/// `dh_generate(group) -> (priv, pub)`. `pub` is returned as an unsigned
/// big-endian big-integer byte string, unpadded — callers that need the
/// fixed `DHPubKeyLen` wire width left-zero-pad it themselves (see
/// `session::handshake`).
pub fn dh_generate<R: RngCore>(group: &DhGroup, rng: &mut R) -> (BigUint, Vec<u8>) {
    // A private exponent in [2, prime - 2] is a conservative, standard choice;
    // sampling below the prime and rejecting 0/1 avoids degenerate exponents.
    let priv_key = loop {
        let candidate = rng.gen_biguint_below(group.prime());
        if candidate > BigUint::from(1u32) {
            break candidate;
        }
    };
    let pub_key = group.generator().modpow(&priv_key, group.prime());
    (priv_key, pub_key.to_bytes_be())
}

/// `dh_compute_secret(priv, peerPub) -> secret`, an unsigned big-endian
/// big-integer byte string, unpadded.
pub fn dh_compute_secret(
    group: &DhGroup,
    priv_key: &BigUint,
    peer_pub: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let peer_pub = BigUint::from_bytes_be(peer_pub);
    if peer_pub <= BigUint::from(1u32) || &peer_pub >= group.prime() {
        return Err(CryptoError::BadDhPublicKey);
    }
    let secret = peer_pub.modpow(priv_key, group.prime());
    Ok(secret.to_bytes_be())
}
