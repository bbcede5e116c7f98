use std::convert::TryFrom;

use common_types::RsaPublicKeyDer;
use rsa::pss::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;

use crate::error::CryptoError;

/// `rsa_verify_pss_sha256(pubKey, message, signature) -> ok?`.
///
/// The public key arrives DER-encoded (PKCS#1 `RSAPublicKey`); verification
/// uses PSS with SHA-256 as both the message hash and the MGF hash, and a
/// salt length of 32 bytes (`VerifyingKey::<Sha256>::new` defaults the salt
/// length to the digest's output size, which is 32 for SHA-256).
pub fn rsa_verify_pss_sha256(
    pub_key: &RsaPublicKeyDer,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    let key = pub_key.parse().map_err(|_| CryptoError::BadKey)?;
    let verifying_key = VerifyingKey::<Sha256>::new(key);

    let sig = match Signature::try_from(signature) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };

    Ok(verifying_key.verify(message, &sig).is_ok())
}
