// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod client;
mod secret_key;

use fhe::bfv::{Encoding, Plaintext};
use fhe_traits::FheDecoder;
use thiserror::Error as ThisError;

pub use client::{decrypt_u32, encrypt_u32, generate_keys, ClientKeys};
pub use secret_key::SecretKeySerializer;

#[derive(ThisError, Debug)]
pub enum ClientError {
    #[error("Error deserializing public key: {0}")]
    PublicKey(String),
    #[error("Error (de)serializing secret key: {0}")]
    SecretKey(String),
    #[error("Error encoding plaintext: {0}")]
    Encoding(String),
    #[error("Error encrypting data: {0}")]
    Encryption(String),
    #[error("Error decrypting data: {0}")]
    Decryption(String),
    #[error(transparent)]
    Ciphertext(#[from] fhc_fhe::CodecError),
    #[error("Plaintext decoding failed")]
    PlaintextDecodeFailed,
}

/// Result that returns a type T or a ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Decode the counter value held in coefficient 0 of a plaintext
pub fn decode_plaintext_to_u32(value: &Plaintext) -> Result<u32> {
    let decoded = Vec::<u64>::try_decode(value, Encoding::poly())
        .map_err(|_| ClientError::PlaintextDecodeFailed)?;
    let first = decoded.first().ok_or(ClientError::PlaintextDecodeFailed)?;
    u32::try_from(*first).map_err(|_| ClientError::PlaintextDecodeFailed)
}
