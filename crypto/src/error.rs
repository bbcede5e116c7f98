use std::{error, fmt};

/// Failure kinds a `CryptoPrimitives` operation can signal. All primitives
/// return a clear success/failure; there are no partial results.
#[derive(Debug)]
pub enum CryptoError {
    /// The RSA public key bytes could not be parsed.
    BadKey,
    /// An RSA-PSS signature failed to verify.
    BadSignature,
    /// The DH computation failed (e.g. a degenerate peer public key).
    BadDhPublicKey,
    /// The underlying crypto backend signalled an unexpected failure.
    Backend(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CryptoError::BadKey => write!(f, "unparseable RSA public key"),
            CryptoError::BadSignature => write!(f, "RSA-PSS signature verification failed"),
            CryptoError::BadDhPublicKey => write!(f, "peer DH public key is invalid for this group"),
            CryptoError::Backend(msg) => write!(f, "crypto backend error: {}", msg),
        }
    }
}

impl error::Error for CryptoError {}
