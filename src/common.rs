//! Constants and domain-separated digests shared by the key schedule.
use sha2::{Digest, Sha256};

/// Ed25519 secret key size
pub const SECRET_KEY_SIZE: usize = 32;
/// Ed25519 public key size
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Ed25519 signature size
pub const SIGNATURE_SIZE: usize = 64;

/// Temporary contact key size (which equals the size of the output of the Hash).
pub const TCK_SIZE: usize = 32;
/// Temporary contact number size, a truncated Hash output.
pub const TCN_SIZE: usize = 16;

/// Domain separator for the temporary contact key ratchet. Must be
/// byte-identical across every implementation of the protocol, and must
/// never be used for any other hashing purpose.
pub const H_TCK_DOMAIN_SEPARATOR: &[u8] = b"H_TCK";

/// Domain separator for temporary contact number derivation. Distinct from
/// [`H_TCK_DOMAIN_SEPARATOR`] so that a broadcast number and a ratchet
/// secret can never collide on the same digest input.
pub const H_TCN_DOMAIN_SEPARATOR: &[u8] = b"H_TCN";

/// Compute the chain seed `tck_0`: `H_TCK(rak_bytes)`.
pub(crate) fn seed_digest(rak_bytes: &[u8; SECRET_KEY_SIZE]) -> [u8; TCK_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(H_TCK_DOMAIN_SEPARATOR);
    hasher.update(rak_bytes);
    hasher.finalize().into()
}

/// Compute one ratchet step: `H_TCK(rvk || tck_bytes)`.
pub(crate) fn ratchet_digest(
    rvk_bytes: &[u8; PUBLIC_KEY_SIZE],
    tck_bytes: &[u8; TCK_SIZE],
) -> [u8; TCK_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(H_TCK_DOMAIN_SEPARATOR);
    hasher.update(rvk_bytes);
    hasher.update(tck_bytes);
    hasher.finalize().into()
}

/// Compute a broadcast number: the first 16 bytes of
/// `H_TCN(le_bytes(index) || tck_bytes)`.
///
/// The index is encoded little-endian here and in every wire layout of
/// this crate.
pub(crate) fn tcn_digest(index: u16, tck_bytes: &[u8; TCK_SIZE]) -> [u8; TCN_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(H_TCN_DOMAIN_SEPARATOR);
    hasher.update(index.to_le_bytes());
    hasher.update(tck_bytes);
    let mut out = [0u8; TCN_SIZE];
    out.copy_from_slice(&hasher.finalize()[..TCN_SIZE]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_separators_are_distinct() {
        assert_ne!(H_TCK_DOMAIN_SEPARATOR, H_TCN_DOMAIN_SEPARATOR);
    }

    #[test]
    fn changing_only_the_separator_changes_the_digest() {
        let payload = [0x42u8; 32];

        let mut tck_side = Sha256::new();
        tck_side.update(H_TCK_DOMAIN_SEPARATOR);
        tck_side.update(&payload);

        let mut tcn_side = Sha256::new();
        tcn_side.update(H_TCN_DOMAIN_SEPARATOR);
        tcn_side.update(&payload);

        assert_ne!(tck_side.finalize(), tcn_side.finalize());
    }

    #[test]
    fn tcn_digest_is_truncated_to_16_bytes() {
        assert_eq!(tcn_digest(1, &[0u8; TCK_SIZE]).len(), TCN_SIZE);
    }

    #[test]
    fn tcn_digest_depends_on_the_index() {
        let tck_bytes = [7u8; TCK_SIZE];
        assert_ne!(tcn_digest(1, &tck_bytes), tcn_digest(2, &tck_bytes));
    }
}
