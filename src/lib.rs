//! A temporary contact number implementation.
//!
//! Derives chains of short-lived, unlinkable 16-byte broadcast identifiers
//! from a single long-lived Ed25519 keypair, and lets the keypair's owner
//! later disclose a chain segment in a signed report that any verifier can
//! check and reconstruct.
//!
//! "The TCN Protocol for Decentralized Privacy-Preserving Contact Tracing"
//! <https://github.com/TCNCoalition/TCN>
//!
//! # Example
//! ```
//! use tcn_ed25519::keys::ReportAuthorizationKey;
//! use tcn_ed25519::report::MemoType;
//!
//! let rak = ReportAuthorizationKey::generate(&mut rand::rngs::OsRng);
//!
//! // The first broadcastable key has index 1; each ratchet step yields the next.
//! let tck_1 = rak.initial_temporary_contact_key();
//! let tcn_1 = tck_1.temporary_contact_number();
//! assert_eq!(tcn_1.as_bytes().len(), 16);
//! let tck_2 = tck_1.ratchet().unwrap();
//! assert_eq!(tck_2.index(), 2);
//!
//! // Disclose the numbers broadcast at indices 1..=8 and verify the report.
//! let signed = rak
//!     .create_report(MemoType::CoEpiV1, b"symptom data".to_vec(), 1, 8)
//!     .unwrap();
//! let report = signed.verify().unwrap();
//! assert_eq!(report.temporary_contact_numbers().count(), 8);
//! ```
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod ed25519;
pub mod errors;
pub mod keys;
pub mod report;
