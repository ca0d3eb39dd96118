//! Implementation of the asymmetric signature scheme that authorizes
//! reports. This is the one place the crate touches the primitive; every
//! supported target signs and verifies with the same genuine Ed25519
//! arithmetic, with no fallback path.
use crate::common::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE};
use crate::errors::Error;
use ed25519_dalek::{
    Signature as EdSignature, Signer, SigningKey as EdSigningKey, VerifyingKey as EdVerifyingKey,
};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
/// An Ed25519 keypair, stored as its raw secret bytes. The verification key
/// is a deterministic function of the secret and is rederived on demand.
pub struct SigningKeyPair(pub(crate) [u8; SECRET_KEY_SIZE]);

impl SigningKeyPair {
    /// Size of the secret-key encoding
    pub const SIZE: usize = SECRET_KEY_SIZE;

    /// Generate a fresh keypair from a cryptographically secure RNG.
    pub fn generate<R: CryptoRngCore>(rng: &mut R) -> Self {
        SigningKeyPair(EdSigningKey::generate(rng).to_bytes())
    }

    /// Rebuild a keypair from its raw secret-key encoding.
    ///
    /// # Errors
    /// This function returns an error if the length of `bytes` is not equal
    /// to `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidSecretKeySize(bytes.len()));
        }

        let mut key = [0u8; Self::SIZE];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Return the raw secret bytes. Exporting them is a deliberate act, for
    /// backup or disclosure only.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }

    /// Return the byte encoding of the verification key.
    pub fn verifying_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        EdSigningKey::from_bytes(&self.0).verifying_key().to_bytes()
    }

    /// Sign `m` with the secret key.
    pub fn sign(&self, m: &[u8]) -> ReportSignature {
        ReportSignature(EdSigningKey::from_bytes(&self.0).sign(m))
    }
}

impl PartialEq for SigningKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SigningKeyPair {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
/// An Ed25519 signature over the canonical bytes of a report.
pub struct ReportSignature(pub(crate) EdSignature);

impl ReportSignature {
    /// Size of the signature encoding
    pub const SIZE: usize = SIGNATURE_SIZE;

    /// Convert a byte array into a signature
    ///
    /// # Errors
    /// This function returns an error if the length of `bytes` is not equal
    /// to `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidSignatureSize(bytes.len()));
        }

        let mut signature = [0u8; Self::SIZE];
        signature.copy_from_slice(bytes);
        Ok(Self(EdSignature::from_bytes(&signature)))
    }

    /// Return `Self` as a byte array.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.0.to_bytes()
    }

    /// Verify this signature over `m` against a report verification key.
    ///
    /// # Errors
    /// The function fails if
    /// * `public_key_bytes` is not 32 bytes long
    /// * the bytes do not decode to a valid curve point
    /// * the signature does not verify over `m`
    pub fn verify(&self, public_key_bytes: &[u8], m: &[u8]) -> Result<(), Error> {
        if public_key_bytes.len() != PUBLIC_KEY_SIZE {
            return Err(Error::InvalidPublicKeySize(public_key_bytes.len()));
        }

        let mut pk = [0u8; PUBLIC_KEY_SIZE];
        pk.copy_from_slice(public_key_bytes);
        let ed_pk =
            EdVerifyingKey::from_bytes(&pk).or(Err(Error::Ed25519InvalidCompressedFormat))?;
        ed_pk.verify_strict(m, &self.0).map_err(Error::from)
    }
}
