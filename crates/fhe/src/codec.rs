// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::CiphertextHandle;
use fhc_utils::ArcBytes;
use fhe::bfv::{BfvParameters, Ciphertext};
use fhe_traits::{DeserializeParametrized, Serialize};
use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};
use thiserror::Error as ThisError;
use tracing::trace;

/// Current version of the external ciphertext envelope
pub const WIRE_VERSION: u8 = 1;
/// Type tag for an encrypted unsigned 32 bit integer
pub const EUINT32_TAG: u8 = 0x04;
/// Length of the envelope header preceding the BFV payload
pub const HEADER_LEN: usize = 2;

/// A freshly encrypted BFV ciphertext has one polynomial per key component.
const FRESH_POLY_COUNT: usize = 2;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Ciphertext too short: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Unsupported ciphertext envelope version {0}")]
    UnsupportedVersion(u8),
    #[error("Unexpected ciphertext type tag {0:#04x}")]
    WrongType(u8),
    #[error("Ciphertext payload is empty")]
    EmptyPayload,
    #[error("Could not deserialize BFV ciphertext: {0}")]
    Deserialize(String),
    #[error("Expected {FRESH_POLY_COUNT} ciphertext polynomials, got {0}")]
    PolynomialCount(usize),
    #[error("Expected a ciphertext at level 0, got level {0}")]
    Level(usize),
}

/// An admitted encrypted u32.
///
/// Immutable once built. Holds the decoded ciphertext, its canonical wire bytes and the handle
/// derived from those bytes.
#[derive(Clone)]
pub struct EncryptedU32 {
    ciphertext: Arc<Ciphertext>,
    params: Arc<BfvParameters>,
    bytes: ArcBytes,
    handle: CiphertextHandle,
}

impl EncryptedU32 {
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    pub fn params(&self) -> &Arc<BfvParameters> {
        &self.params
    }

    /// Canonical wire encoding
    pub fn bytes(&self) -> &ArcBytes {
        &self.bytes
    }

    pub fn handle(&self) -> CiphertextHandle {
        self.handle
    }
}

impl fmt::Debug for EncryptedU32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedU32")
            .field("handle", &self.handle)
            .field("len", &self.bytes.size_bytes())
            .finish()
    }
}

impl PartialEq for EncryptedU32 {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for EncryptedU32 {}

/// Translates between external ciphertext bytes and [`EncryptedU32`].
///
/// Only structural checks happen here. Whether the ciphertext was honestly produced is a
/// question for the proof verifier.
#[derive(Clone, Debug)]
pub struct CiphertextCodec {
    params: Arc<BfvParameters>,
}

impl CiphertextCodec {
    pub fn new(params: Arc<BfvParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Arc<BfvParameters> {
        &self.params
    }

    pub fn decode(&self, raw: &[u8]) -> Result<EncryptedU32, CodecError> {
        if raw.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                expected: HEADER_LEN + 1,
                actual: raw.len(),
            });
        }
        if raw[0] != WIRE_VERSION {
            return Err(CodecError::UnsupportedVersion(raw[0]));
        }
        if raw[1] != EUINT32_TAG {
            return Err(CodecError::WrongType(raw[1]));
        }

        let payload = &raw[HEADER_LEN..];
        if payload.is_empty() {
            return Err(CodecError::EmptyPayload);
        }

        // The library may panic on adversarial polynomial data rather than erroring.
        let ct = catch_unwind(AssertUnwindSafe(|| {
            Ciphertext::from_bytes(payload, &self.params)
        }))
        .map_err(|_| CodecError::Deserialize("ciphertext library panicked".to_string()))?
        .map_err(|e| CodecError::Deserialize(e.to_string()))?;

        if ct.c.len() != FRESH_POLY_COUNT {
            return Err(CodecError::PolynomialCount(ct.c.len()));
        }
        if ct.level != 0 {
            return Err(CodecError::Level(ct.level));
        }

        let encrypted = self.wrap(ct);
        trace!(handle = %encrypted.handle(), "decoded external ciphertext");
        Ok(encrypted)
    }

    pub fn encode(&self, value: &EncryptedU32) -> Vec<u8> {
        value.bytes.extract_bytes()
    }

    /// Wraps a ciphertext produced under this codec's parameters.
    pub fn wrap(&self, ct: Ciphertext) -> EncryptedU32 {
        let bytes = encode_envelope(&ct);
        EncryptedU32 {
            handle: CiphertextHandle::of(&bytes),
            bytes: ArcBytes::from_bytes(&bytes),
            ciphertext: Arc::new(ct),
            params: self.params.clone(),
        }
    }
}

/// Encodes a BFV ciphertext into the external envelope format.
pub fn encode_envelope(ct: &Ciphertext) -> Vec<u8> {
    let payload = ct.to_bytes();
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.push(WIRE_VERSION);
    bytes.push(EUINT32_TAG);
    bytes.extend_from_slice(&payload);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::keys;

    #[test]
    fn decodes_a_fresh_encryption() {
        let keys = keys();
        let codec = CiphertextCodec::new(keys.params.clone());
        let raw = encode_envelope(&keys.encrypt(42));

        let decoded = codec.decode(&raw).unwrap();
        assert_eq!(decoded.bytes().extract_bytes(), raw);
        assert_eq!(decoded.handle(), CiphertextHandle::of(&raw));
        assert_eq!(keys.decrypt(decoded.ciphertext()), 42);
        assert_eq!(codec.encode(&decoded), raw);
    }

    #[test]
    fn rejects_truncated_input() {
        let keys = keys();
        let codec = CiphertextCodec::new(keys.params.clone());
        let raw = encode_envelope(&keys.encrypt(1));

        assert!(matches!(
            codec.decode(&[]),
            Err(CodecError::Truncated { actual: 0, .. })
        ));
        assert!(matches!(
            codec.decode(&raw[..1]),
            Err(CodecError::Truncated { actual: 1, .. })
        ));
        assert_eq!(codec.decode(&raw[..2]), Err(CodecError::EmptyPayload));
        assert!(matches!(
            codec.decode(&raw[..raw.len() / 2]),
            Err(CodecError::Deserialize(_))
        ));
    }

    #[test]
    fn rejects_wrong_header() {
        let keys = keys();
        let codec = CiphertextCodec::new(keys.params.clone());
        let mut raw = encode_envelope(&keys.encrypt(1));

        raw[0] = 2;
        assert_eq!(codec.decode(&raw), Err(CodecError::UnsupportedVersion(2)));

        raw[0] = WIRE_VERSION;
        raw[1] = 0x05;
        assert_eq!(codec.decode(&raw), Err(CodecError::WrongType(0x05)));
    }

    #[test]
    fn rejects_garbage_payload() {
        let keys = keys();
        let codec = CiphertextCodec::new(keys.params.clone());
        let mut raw = vec![WIRE_VERSION, EUINT32_TAG];
        raw.extend(std::iter::repeat(0xff).take(64));
        assert!(matches!(codec.decode(&raw), Err(CodecError::Deserialize(_))));
    }

    #[test]
    fn rejects_ciphertext_below_top_level() {
        let keys = keys();
        let codec = CiphertextCodec::new(keys.params.clone());
        let mut ct = keys.encrypt(7);
        ct.mod_switch_to_next_level().unwrap();
        assert_eq!(
            codec.decode(&encode_envelope(&ct)),
            Err(CodecError::Level(1))
        );
    }

    #[test]
    fn rejects_ciphertext_from_other_preset() {
        let keys = keys();
        let other = CiphertextCodec::new(
            fhc_fhe_params::CounterPreset::SecureCounter8192
                .build_arc()
                .unwrap(),
        );
        let raw = encode_envelope(&keys.encrypt(3));
        assert!(matches!(other.decode(&raw), Err(CodecError::Deserialize(_))));
    }
}
