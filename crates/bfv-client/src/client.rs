// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{decode_plaintext_to_u32, ClientError, Result, SecretKeySerializer};
use fhc_fhe::{encode_envelope, CiphertextCodec};
use fhe::bfv::{BfvParameters, Encoding, Plaintext, PublicKey, SecretKey};
use fhe_traits::{DeserializeParametrized, FheDecrypter, FheEncoder, FheEncrypter, Serialize};
use rand::thread_rng;
use std::sync::Arc;
use zeroize::Zeroizing;

/// A freshly generated key pair in serialized form
pub struct ClientKeys {
    pub secret_key: Zeroizing<Vec<u8>>,
    pub public_key: Vec<u8>,
}

/// Generate a BFV key pair for the given parameters
pub fn generate_keys(params: &Arc<BfvParameters>) -> Result<ClientKeys> {
    let mut rng = thread_rng();
    let sk = SecretKey::random(params, &mut rng);
    let pk = PublicKey::new(&sk, &mut rng);
    Ok(ClientKeys {
        secret_key: SecretKeySerializer::to_bytes(&sk)?,
        public_key: pk.to_bytes(),
    })
}

/// Encrypt a u32 under a serialized public key
///
/// # Arguments
/// * `value` - The value to encrypt
/// * `public_key` - Serialized BFV public key bytes
/// * `params` - BFV parameters of the target counter
///
/// # Returns
/// The external ciphertext envelope accepted by the counter
pub fn encrypt_u32(value: u32, public_key: &[u8], params: &Arc<BfvParameters>) -> Result<Vec<u8>> {
    let pk = PublicKey::from_bytes(public_key, params)
        .map_err(|e| ClientError::PublicKey(e.to_string()))?;

    let input = vec![u64::from(value)];
    let pt = Plaintext::try_encode(&input, Encoding::poly(), params)
        .map_err(|e| ClientError::Encoding(e.to_string()))?;

    let ct = pk
        .try_encrypt(&pt, &mut thread_rng())
        .map_err(|e| ClientError::Encryption(e.to_string()))?;

    Ok(encode_envelope(&ct))
}

/// Decrypt an external ciphertext envelope with a serialized secret key
pub fn decrypt_u32(
    secret_key: &[u8],
    ciphertext: &[u8],
    params: &Arc<BfvParameters>,
) -> Result<u32> {
    let sk = SecretKeySerializer::from_bytes(secret_key, params)?;
    let encrypted = CiphertextCodec::new(params.clone()).decode(ciphertext)?;
    let pt = sk
        .try_decrypt(encrypted.ciphertext())
        .map_err(|e| ClientError::Decryption(e.to_string()))?;
    decode_plaintext_to_u32(&pt)
}
