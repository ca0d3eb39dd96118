//! Disclosure reports binding a chain segment to its authorization key.
//!
//! A report carries the key one step before the disclosed window,
//! `tck_{j_1 - 1}`, so a verifier can re-run the ratchet and reproduce the
//! numbers for indices `j_1 ..= j_2` byte-for-byte, and nothing earlier.
//! The signature over the report's canonical bytes ties the window to the
//! report verification key embedded in it.
use crate::common::{PUBLIC_KEY_SIZE, SIGNATURE_SIZE, TCK_SIZE};
use crate::ed25519::ReportSignature;
use crate::errors::Error;
use crate::keys::{ReportAuthorizationKey, TemporaryContactKey, TemporaryContactNumber};

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

/// Maximum memo payload size; the wire layout spends a single length byte.
pub const MAX_MEMO_SIZE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
/// The assigned interpretations of a report's memo payload.
pub enum MemoType {
    /// CoEpi symptom self-report, version 1.
    CoEpiV1,
    /// CovidWatch test result, version 1.
    CovidWatchV1,
    /// ito exposure report, version 1.
    ItoV1,
}

impl MemoType {
    /// The tag byte of this memo type on the wire.
    pub fn as_u8(self) -> u8 {
        match self {
            MemoType::CoEpiV1 => 0,
            MemoType::CovidWatchV1 => 1,
            MemoType::ItoV1 => 2,
        }
    }

    /// Convert a tag byte into a memo type.
    ///
    /// # Errors
    /// This function returns an error if `tag` is not assigned.
    pub fn from_u8(tag: u8) -> Result<Self, Error> {
        match tag {
            0 => Ok(MemoType::CoEpiV1),
            1 => Ok(MemoType::CovidWatchV1),
            2 => Ok(MemoType::ItoV1),
            _ => Err(Error::UnknownMemoType(tag)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
/// A disclosed chain segment: everything a verifier needs to reconstruct
/// the temporary contact numbers for the indices `j_1 ..= j_2`.
pub struct Report {
    rvk_bytes: [u8; PUBLIC_KEY_SIZE],
    tck_bytes: [u8; TCK_SIZE],
    j_1: u16,
    j_2: u16,
    memo_type: MemoType,
    memo_data: Vec<u8>,
}

/// `start == 0` would disclose the internal seed's number slot, and an
/// empty window has nothing to verify.
fn check_window(start: u16, end: u16, memo_len: usize) -> Result<(), Error> {
    if start == 0 || end < start {
        return Err(Error::InvalidReportIndexRange { start, end });
    }
    if memo_len > MAX_MEMO_SIZE {
        return Err(Error::OversizedMemo(memo_len));
    }
    Ok(())
}

impl Report {
    /// Size of the wire encoding up to, but not including, the memo payload:
    /// `rvk || tck_bytes || le_bytes(j_1) || le_bytes(j_2) || memo_type || memo_len`.
    pub const MIN_SIZE: usize = PUBLIC_KEY_SIZE + TCK_SIZE + 2 + 2 + 1 + 1;

    /// The 32 bytes of the Ed25519 public key used for report verification.
    pub fn report_verification_public_key_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.rvk_bytes
    }

    /// First ratchet index of the disclosed window.
    pub fn start_index(&self) -> u16 {
        self.j_1
    }

    /// Last ratchet index of the disclosed window, inclusive.
    pub fn end_index(&self) -> u16 {
        self.j_2
    }

    /// Interpretation of the memo payload.
    pub fn memo_type(&self) -> MemoType {
        self.memo_type
    }

    /// The memo payload.
    pub fn memo_data(&self) -> &[u8] {
        &self.memo_data
    }

    /// Re-run the ratchet from the disclosed key and yield the temporary
    /// contact numbers for the indices `j_1 ..= j_2`, in order. Comparing
    /// these byte-for-byte against observed numbers is the chain
    /// reconstruction check; it is independent of signature verification.
    pub fn temporary_contact_numbers(&self) -> impl Iterator<Item = TemporaryContactNumber> {
        let mut tck = TemporaryContactKey::new(self.j_1 - 1, self.rvk_bytes, self.tck_bytes);
        (self.j_1..=self.j_2).map(move |_| {
            tck = tck
                .ratchet()
                .expect("window indices never pass the ratchet limit");
            tck.temporary_contact_number()
        })
    }

    /// Convert `Self` into its canonical byte representation, the exact
    /// bytes the report signature covers:
    /// `rvk || tck_bytes || le_bytes(j_1) || le_bytes(j_2) || memo_type || memo_len || memo_data`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::MIN_SIZE + self.memo_data.len());
        bytes.extend_from_slice(&self.rvk_bytes);
        bytes.extend_from_slice(&self.tck_bytes);
        bytes.extend_from_slice(&self.j_1.to_le_bytes());
        bytes.extend_from_slice(&self.j_2.to_le_bytes());
        bytes.push(self.memo_type.as_u8());
        bytes.push(self.memo_data.len() as u8);
        bytes.extend_from_slice(&self.memo_data);
        bytes
    }

    /// Convert the slice of bytes into `Self`.
    ///
    /// # Errors
    /// The function fails if
    /// * `bytes.len()` does not match the fixed prefix plus the declared
    ///   memo length
    /// * the memo-type tag is not assigned
    /// * the index window is empty or starts at 0
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(Error::InvalidReportSize(bytes.len()));
        }

        let mut rvk_bytes = [0u8; PUBLIC_KEY_SIZE];
        rvk_bytes.copy_from_slice(&bytes[..PUBLIC_KEY_SIZE]);
        let mut tck_bytes = [0u8; TCK_SIZE];
        tck_bytes.copy_from_slice(&bytes[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + TCK_SIZE]);

        let mut u16_bytes = [0u8; 2];
        u16_bytes.copy_from_slice(&bytes[64..66]);
        let j_1 = u16::from_le_bytes(u16_bytes);
        u16_bytes.copy_from_slice(&bytes[66..68]);
        let j_2 = u16::from_le_bytes(u16_bytes);

        let memo_type = MemoType::from_u8(bytes[68])?;
        let memo_len = bytes[69] as usize;
        if bytes.len() != Self::MIN_SIZE + memo_len {
            return Err(Error::InvalidReportSize(bytes.len()));
        }
        check_window(j_1, j_2, memo_len)?;

        Ok(Report {
            rvk_bytes,
            tck_bytes,
            j_1,
            j_2,
            memo_type,
            memo_data: bytes[Self::MIN_SIZE..].to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
/// A report plus the signature its authorization key produced over the
/// report's canonical bytes. The inner report is only reachable through
/// [`verify`](SignedReport::verify).
pub struct SignedReport {
    report: Report,
    signature: ReportSignature,
}

impl SignedReport {
    /// Verify the signature over the report's canonical bytes against the
    /// report verification key the report itself discloses.
    ///
    /// # Errors
    /// The function fails if the signature does not verify. A failure is a
    /// normal outcome for a hostile or mangled report, distinct from the
    /// malformed-input errors of [`from_bytes`](SignedReport::from_bytes).
    pub fn verify(&self) -> Result<&Report, Error> {
        self.signature
            .verify(&self.report.rvk_bytes, &self.report.to_bytes())?;
        Ok(&self.report)
    }

    /// Convert `Self` into its byte representation:
    /// `report || signature`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.report.to_bytes();
        bytes.extend_from_slice(&self.signature.to_bytes());
        bytes
    }

    /// Convert the slice of bytes into `Self`. Parsing performs no
    /// signature check; call [`verify`](SignedReport::verify) before using
    /// the report.
    ///
    /// # Errors
    /// The function fails if the report part is malformed or the trailing
    /// signature is not 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Report::MIN_SIZE + SIGNATURE_SIZE {
            return Err(Error::InvalidReportSize(bytes.len()));
        }

        let (report_bytes, signature_bytes) = bytes.split_at(bytes.len() - SIGNATURE_SIZE);
        Ok(SignedReport {
            report: Report::from_bytes(report_bytes)?,
            signature: ReportSignature::from_bytes(signature_bytes)?,
        })
    }
}

impl ReportAuthorizationKey {
    /// Create and sign a disclosure report for the temporary contact
    /// numbers broadcast at indices `j_1 ..= j_2`.
    ///
    /// # Errors
    /// The function fails if the window is empty or starts at 0, or the
    /// memo payload exceeds [`MAX_MEMO_SIZE`].
    pub fn create_report(
        &self,
        memo_type: MemoType,
        memo_data: Vec<u8>,
        j_1: u16,
        j_2: u16,
    ) -> Result<SignedReport, Error> {
        check_window(j_1, j_2, memo_data.len())?;

        // Walk the chain from the seed to tck_{j_1 - 1}.
        let mut tck = self.tck_0();
        for _ in 1..j_1 {
            tck = tck
                .ratchet()
                .expect("indices before the window never pass the ratchet limit");
        }

        let report = Report {
            rvk_bytes: self.report_verification_public_key_bytes(),
            tck_bytes: *tck.bytes(),
            j_1,
            j_2,
            memo_type,
            memo_data,
        };
        let signature = self.keypair.sign(&report.to_bytes());

        Ok(SignedReport { report, signature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn verifier_reconstructs_the_numbers_the_owner_broadcast() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);

        // Owner side: broadcast the numbers for indices 1..=20.
        let mut tck = rak.initial_temporary_contact_key();
        let mut broadcast = vec![tck.temporary_contact_number()];
        for _ in 2..=20u16 {
            tck = tck.ratchet().unwrap();
            broadcast.push(tck.temporary_contact_number());
        }

        // Disclose indices 5..=13 and reconstruct them from the report.
        let signed = rak
            .create_report(MemoType::CovidWatchV1, b"positive test".to_vec(), 5, 13)
            .unwrap();
        let report = signed.verify().unwrap();
        let reconstructed: Vec<_> = report.temporary_contact_numbers().collect();

        assert_eq!(reconstructed, broadcast[4..=12].to_vec());
    }

    #[test]
    fn window_count_matches_the_disclosed_range() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let signed = rak
            .create_report(MemoType::CoEpiV1, Vec::new(), 1, 1)
            .unwrap();

        assert_eq!(signed.verify().unwrap().temporary_contact_numbers().count(), 1);
    }

    #[test]
    fn signed_report_round_trips_and_verifies() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let signed = rak
            .create_report(MemoType::ItoV1, b"memo".to_vec(), 3, 9)
            .unwrap();

        let restored = SignedReport::from_bytes(&signed.to_bytes()).unwrap();
        assert_eq!(signed, restored);

        let report = restored.verify().unwrap();
        assert_eq!(report.start_index(), 3);
        assert_eq!(report.end_index(), 9);
        assert_eq!(report.memo_type(), MemoType::ItoV1);
        assert_eq!(report.memo_data(), b"memo");
    }

    #[test]
    fn a_tampered_report_fails_verification() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let signed = rak
            .create_report(MemoType::CoEpiV1, b"symptom data".to_vec(), 2, 6)
            .unwrap();

        let mut bytes = signed.to_bytes();
        // Flip one memo bit; the signature must no longer cover the bytes.
        bytes[Report::MIN_SIZE] ^= 0x01;
        let tampered = SignedReport::from_bytes(&bytes).unwrap();

        assert!(matches!(
            tampered.verify(),
            Err(Error::Ed25519Signature(_))
        ));
    }

    #[test]
    fn a_report_signed_by_another_key_fails_verification() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let other = ReportAuthorizationKey::generate(&mut OsRng);

        let signed = rak
            .create_report(MemoType::CoEpiV1, Vec::new(), 1, 4)
            .unwrap();
        let mut bytes = signed.to_bytes();
        // Swap in the other chain's verification key.
        bytes[..PUBLIC_KEY_SIZE]
            .copy_from_slice(&other.report_verification_public_key_bytes());

        let forged = SignedReport::from_bytes(&bytes).unwrap();
        assert!(forged.verify().is_err());
    }

    #[test]
    fn windows_starting_at_the_seed_are_rejected() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        assert!(matches!(
            rak.create_report(MemoType::CoEpiV1, Vec::new(), 0, 5),
            Err(Error::InvalidReportIndexRange { start: 0, end: 5 })
        ));
    }

    #[test]
    fn empty_windows_are_rejected() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        assert!(matches!(
            rak.create_report(MemoType::CoEpiV1, Vec::new(), 8, 7),
            Err(Error::InvalidReportIndexRange { start: 8, end: 7 })
        ));
    }

    #[test]
    fn oversized_memos_are_rejected() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        assert!(matches!(
            rak.create_report(MemoType::CoEpiV1, vec![0u8; 256], 1, 2),
            Err(Error::OversizedMemo(256))
        ));
    }

    #[test]
    fn unknown_memo_tags_fail_to_parse() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let mut bytes = rak
            .create_report(MemoType::CoEpiV1, Vec::new(), 1, 2)
            .unwrap()
            .to_bytes();
        bytes[68] = 0x77;

        assert!(matches!(
            SignedReport::from_bytes(&bytes),
            Err(Error::UnknownMemoType(0x77))
        ));
    }

    #[test]
    fn declared_memo_length_must_match_the_payload() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let signed = rak
            .create_report(MemoType::CoEpiV1, b"abc".to_vec(), 1, 2)
            .unwrap();

        let mut bytes = signed.to_bytes();
        bytes[69] = 200;
        let report_len = bytes.len() - SIGNATURE_SIZE;
        assert!(matches!(
            Report::from_bytes(&bytes[..report_len]),
            Err(Error::InvalidReportSize(_))
        ));
    }

    #[test]
    fn truncated_reports_fail_to_parse() {
        assert!(matches!(
            SignedReport::from_bytes(&[0u8; 40]),
            Err(Error::InvalidReportSize(40))
        ));
    }

    #[test]
    fn the_disclosed_key_is_one_step_before_the_window() {
        let rak = ReportAuthorizationKey::generate(&mut OsRng);
        let tck_1 = rak.initial_temporary_contact_key();

        let signed = rak
            .create_report(MemoType::CoEpiV1, Vec::new(), 2, 4)
            .unwrap();
        let bytes = signed.to_bytes();

        assert_eq!(
            &bytes[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + TCK_SIZE],
            &tck_1.bytes()[..]
        );
    }
}
