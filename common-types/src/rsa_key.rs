use std::{error, fmt};

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::RsaPublicKey;

#[derive(Debug)]
pub struct BadKeyError;

impl fmt::Display for BadKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unparseable RSA public key")
    }
}

impl error::Error for BadKeyError {}

/// The server's RSA public key as delivered on the wire: DER-encoded
/// `RSAPublicKey` (PKCS#1) bytes, opaque until parsed.
#[derive(Clone, Eq, PartialEq)]
pub struct RsaPublicKeyDer(Vec<u8>);

impl fmt::Debug for RsaPublicKeyDer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RsaPublicKeyDer({} bytes)", self.0.len())
    }
}

impl RsaPublicKeyDer {
    pub fn from_der(bytes: Vec<u8>) -> Self {
        RsaPublicKeyDer(bytes)
    }

    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    pub fn parse(&self) -> Result<RsaPublicKey, BadKeyError> {
        RsaPublicKey::from_pkcs1_der(&self.0).map_err(|_| BadKeyError)
    }

    /// Size in bytes of the RSA modulus, i.e. the signature length.
    pub fn modulus_len(&self) -> Result<usize, BadKeyError> {
        use rsa::traits::PublicKeyParts;

        Ok(self.parse()?.size())
    }
}
