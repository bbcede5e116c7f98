use common_types::RsaPublicKeyDer;

use crate::error::SessionError;

pub const NONCE_LEN: usize = 32;
pub const CURRENT_PROTOCOL_VERSION: u8 = 1;

/// `bytes_to_read_for_server_hello(rsaPubKey)`: `1 + DHPubKeyLen +
/// RSA_modulus_size(rsaPubKey) + NonceLen`.
pub fn bytes_to_read_for_server_hello(
    dh_pub_key_len: usize,
    rsa_pub_key: &RsaPublicKeyDer,
) -> Result<usize, SessionError> {
    let modulus_len = rsa_pub_key.modulus_len().map_err(|_| SessionError::BadKey)?;
    Ok(1 + dh_pub_key_len + modulus_len + NONCE_LEN)
}

/// A parsed, not-yet-verified Server Hello buffer:
/// `version(1) ‖ serverDHPub(DHPubKeyLen) ‖ rsaPssSig(modulus bytes) ‖ nonce(32)`.
pub struct ServerHello<'a> {
    pub version: u8,
    pub server_dh_pub: &'a [u8],
    pub signature: &'a [u8],
    pub nonce: &'a [u8],
    /// `version ‖ serverDHPub`, the exact bytes the RSA-PSS signature covers.
    pub signed_prefix: &'a [u8],
}

pub fn parse_server_hello<'a>(
    buf: &'a [u8],
    dh_pub_key_len: usize,
    modulus_len: usize,
) -> Result<ServerHello<'a>, SessionError> {
    let expected = 1 + dh_pub_key_len + modulus_len + NONCE_LEN;
    if buf.len() != expected {
        return Err(SessionError::MalformedFrame);
    }

    let (signed_prefix, rest) = buf.split_at(1 + dh_pub_key_len);
    let (signature, nonce) = rest.split_at(modulus_len);

    Ok(ServerHello {
        version: signed_prefix[0],
        server_dh_pub: &signed_prefix[1..],
        signature,
        nonce,
        signed_prefix,
    })
}

/// Left-zero-pad `bytes` to exactly `len`, as required for the client DH
/// public key transmitted in the Client Hello.
pub fn left_zero_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    assert!(bytes.len() <= len, "value is longer than the target width");
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}
