//! Errors specific to contact key derivation and report verification
use ed25519_dalek as ed25519;

#[derive(Debug, Clone)]
/// Enum of error associated with temporary contact number reports
pub enum Error {
    /// This error occurs when a well-formed signature does not verify over
    /// the given report bytes. Distinct from the malformed-input errors
    /// below, so that callers can tell a hostile-but-parseable report from
    /// a corrupt one.
    Ed25519Signature(String),
    /// This error occurs when a slice of bytes is converted into a compressed
    /// point format, and it fails.
    Ed25519InvalidCompressedFormat,
    /// Error occurs when the size of the secret key is not the expected.
    InvalidSecretKeySize(usize),
    /// Error occurs when the size of the public key is not the expected.
    InvalidPublicKeySize(usize),
    /// Error occurs when the size of the signature is not the expected.
    InvalidSignatureSize(usize),
    /// Error occurs when the size of a serialized temporary contact key is
    /// not the expected.
    InvalidTemporaryContactKeySize(usize),
    /// Error occurs when a report window starts at index 0 (the internal
    /// seed, which is never broadcast) or ends before it starts.
    InvalidReportIndexRange {
        /// First ratchet index claimed by the report.
        start: u16,
        /// Last ratchet index claimed by the report.
        end: u16,
    },
    /// Error occurs when a memo payload does not fit the single length byte
    /// of the report wire layout.
    OversizedMemo(usize),
    /// Error occurs when a memo-type tag is not assigned.
    UnknownMemoType(u8),
    /// Error occurs when the size of a serialized report does not match its
    /// fixed prefix plus the declared memo length.
    InvalidReportSize(usize),
}

impl From<ed25519::SignatureError> for Error {
    fn from(sig: ed25519::SignatureError) -> Error {
        Error::Ed25519Signature(format!("{:?}", sig))
    }
}
