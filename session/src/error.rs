use std::{error, fmt};

use codec::CodecError;
use crypto::CryptoError;

/// All errors are fatal to the session: whichever of these is returned, the
/// session has already transitioned to `Phase::Failed` and every subsequent
/// call will return `SessionFailed`.
#[derive(Debug)]
pub enum SessionError {
    /// The RSA public key supplied for the handshake is unparseable.
    BadKey,
    /// The server hello's version byte didn't match `CurrentProtocolVersion`.
    ProtocolVersion,
    /// The server hello's RSA-PSS signature failed to verify.
    BadSignature,
    /// An inbound record's HMAC tag didn't match.
    BadMac,
    /// The codec could not parse a decrypted plaintext buffer.
    MalformedFrame,
    /// Snappy refused a compressed payload.
    DecompressError,
    /// A crypto primitive signalled an unexpected failure (e.g. a
    /// degenerate DH public key).
    CryptoBackend,
    /// The session is in `Phase::Failed` (or not yet `Established`, for
    /// operations that require it); it must not be reused.
    SessionFailed,
    /// Encoding a command produced a zero-length frame.
    EmptyFrame,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::BadKey => write!(f, "unparseable RSA public key"),
            SessionError::ProtocolVersion => write!(f, "server hello protocol version mismatch"),
            SessionError::BadSignature => write!(f, "server hello RSA-PSS signature is invalid"),
            SessionError::BadMac => write!(f, "record HMAC tag mismatch"),
            SessionError::MalformedFrame => write!(f, "malformed command frame"),
            SessionError::DecompressError => write!(f, "snappy decompression failed"),
            SessionError::CryptoBackend => write!(f, "crypto backend failure"),
            SessionError::SessionFailed => write!(f, "session is not usable in its current phase"),
            SessionError::EmptyFrame => write!(f, "encode produced an empty frame"),
        }
    }
}

impl error::Error for SessionError {}

impl From<CryptoError> for SessionError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::BadKey => SessionError::BadKey,
            CryptoError::BadSignature => SessionError::BadSignature,
            CryptoError::BadDhPublicKey | CryptoError::Backend(_) => SessionError::CryptoBackend,
        }
    }
}

impl From<CodecError> for SessionError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EmptyFrame => SessionError::EmptyFrame,
            CodecError::MalformedFrame(_) => SessionError::MalformedFrame,
            CodecError::DecompressError => SessionError::DecompressError,
        }
    }
}
