//! Report authorization keys and the temporary contact key ratchet.
//!
//! One `ReportAuthorizationKey` anchors one chain: hashing its secret key
//! yields the internal seed `tck_0`, and each ratchet step hashes the
//! previous key together with the chain's constant verification key. Only
//! keys at index 1 and above ever derive a broadcast number.
use crate::common;
use crate::common::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, TCK_SIZE, TCN_SIZE};
use crate::ed25519::SigningKeyPair;
use crate::errors::Error;
use core::fmt;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

#[derive(Debug, Clone)]
/// Authorizes publication of a report of potential exposure.
pub struct ReportAuthorizationKey {
    pub(crate) keypair: SigningKeyPair,
}

impl ReportAuthorizationKey {
    /// Size of the secret-key encoding
    pub const SIZE: usize = SigningKeyPair::SIZE;

    /// Generate a new report authorization key from a cryptographically
    /// secure RNG.
    pub fn generate<R: CryptoRngCore>(rng: &mut R) -> Self {
        ReportAuthorizationKey {
            keypair: SigningKeyPair::generate(rng),
        }
    }

    /// Rebuild a report authorization key from its raw secret-key encoding.
    ///
    /// # Errors
    /// This function returns an error if the length of `bytes` is not equal
    /// to `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(ReportAuthorizationKey {
            keypair: SigningKeyPair::from_bytes(bytes)?,
        })
    }

    /// Return the raw secret bytes. Exporting them is a deliberate act, for
    /// backup or disclosure only.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        self.keypair.as_bytes()
    }

    /// The 32 bytes of the Ed25519 public key used for report verification.
    /// Constant across the entire chain derived from this key.
    pub fn report_verification_public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.keypair.verifying_key_bytes()
    }

    /// The chain seed `tck_0`. Internal: the seed is never handed out and
    /// never derives a temporary contact number, since its bytes are a
    /// single hash away from the secret key.
    pub(crate) fn tck_0(&self) -> TemporaryContactKey {
        TemporaryContactKey {
            index: 0,
            rvk_bytes: self.keypair.verifying_key_bytes(),
            tck_bytes: common::seed_digest(self.keypair.as_bytes()),
        }
    }

    /// Compute the initial temporary contact key derived from this report
    /// authorization key.
    ///
    /// Note: this returns `tck_1`, the first temporary contact key that can
    /// be used to generate tcns.
    pub fn initial_temporary_contact_key(&self) -> TemporaryContactKey {
        self.tck_0()
            .ratchet()
            .expect("index 0 is always below the ratchet limit")
    }
}

/// Two report authorization keys are equal iff their secret keys are
/// byte-equal; every derived field is a function of the secret key.
impl PartialEq for ReportAuthorizationKey {
    fn eq(&self, other: &Self) -> bool {
        self.keypair == other.keypair
    }
}

impl Eq for ReportAuthorizationKey {}

#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
/// A ratcheting key used to derive temporary contact numbers.
pub struct TemporaryContactKey {
    /// The current ratchet index.
    index: u16,
    /// The 32 bytes of the Ed25519 public key used for report verification.
    rvk_bytes: [u8; PUBLIC_KEY_SIZE],
    /// The 32 bytes of the temporary contact key.
    tck_bytes: [u8; TCK_SIZE],
}

impl TemporaryContactKey {
    /// Size of the wire encoding: `le_bytes(index) || rvk || tck_bytes`.
    pub const SIZE: usize = 2 + PUBLIC_KEY_SIZE + TCK_SIZE;

    /// Assemble a temporary contact key from its parts, typically the ones
    /// disclosed in a report.
    pub fn new(
        index: u16,
        report_verification_public_key_bytes: [u8; PUBLIC_KEY_SIZE],
        bytes: [u8; TCK_SIZE],
    ) -> Self {
        TemporaryContactKey {
            index,
            rvk_bytes: report_verification_public_key_bytes,
            tck_bytes: bytes,
        }
    }

    /// The current ratchet index.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// The 32 bytes of the Ed25519 public key used for report verification.
    pub fn report_verification_public_key_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.rvk_bytes
    }

    /// The 32 bytes of the temporary contact key.
    pub fn bytes(&self) -> &[u8; TCK_SIZE] {
        &self.tck_bytes
    }

    /// Compute the temporary contact number derived from this key.
    pub fn temporary_contact_number(&self) -> TemporaryContactNumber {
        TemporaryContactNumber(common::tcn_digest(self.index, &self.tck_bytes))
    }

    /// Ratchet the key forward, producing a new key for a new temporary
    /// contact number. The key itself is left untouched; a chain is a
    /// sequence of immutable snapshots.
    ///
    /// Returns `None` if `index` is `u16::MAX`, signaling that this chain
    /// is exhausted and the report authorization key must be rotated. This
    /// is an expected terminal condition, not an error.
    pub fn ratchet(&self) -> Option<TemporaryContactKey> {
        if self.index == u16::MAX {
            return None;
        }

        Some(TemporaryContactKey {
            index: self.index + 1,
            rvk_bytes: self.rvk_bytes,
            tck_bytes: common::ratchet_digest(&self.rvk_bytes, &self.tck_bytes),
        })
    }

    /// Convert `Self` into its byte representation:
    /// `le_bytes(index) || rvk || tck_bytes`.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut data = [0u8; Self::SIZE];
        data[..2].copy_from_slice(&self.index.to_le_bytes());
        data[2..2 + PUBLIC_KEY_SIZE].copy_from_slice(&self.rvk_bytes);
        data[2 + PUBLIC_KEY_SIZE..].copy_from_slice(&self.tck_bytes);
        data
    }

    /// Convert the slice of bytes into `Self`.
    ///
    /// # Errors
    /// This function returns an error if the length of `bytes` is not equal
    /// to `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidTemporaryContactKeySize(bytes.len()));
        }

        let mut index_bytes = [0u8; 2];
        index_bytes.copy_from_slice(&bytes[..2]);
        let mut rvk_bytes = [0u8; PUBLIC_KEY_SIZE];
        rvk_bytes.copy_from_slice(&bytes[2..2 + PUBLIC_KEY_SIZE]);
        let mut tck_bytes = [0u8; TCK_SIZE];
        tck_bytes.copy_from_slice(&bytes[2 + PUBLIC_KEY_SIZE..]);

        Ok(TemporaryContactKey {
            index: u16::from_le_bytes(index_bytes),
            rvk_bytes,
            tck_bytes,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_enabled", derive(serde::Serialize, serde::Deserialize))]
/// A pseudorandom 128-bit value broadcast to nearby devices.
pub struct TemporaryContactNumber(pub [u8; TCN_SIZE]);

impl TemporaryContactNumber {
    /// The 16 bytes of the temporary contact number, suitable for direct
    /// use as a broadcast payload.
    pub fn as_bytes(&self) -> &[u8; TCN_SIZE] {
        &self.0
    }
}

impl fmt::Debug for TemporaryContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemporaryContactNumber(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TemporaryContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
