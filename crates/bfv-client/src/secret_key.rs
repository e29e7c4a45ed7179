// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ClientError, Result};
use fhe::bfv::{BfvParameters, SecretKey};
use std::sync::Arc;
use zeroize::Zeroizing;

/// The library does not serialize secret keys, so the coefficients are written out directly.
pub struct SecretKeySerializer;

#[derive(serde::Serialize, serde::Deserialize)]
struct SecretKeyData {
    coeffs: Box<[i64]>,
}

impl SecretKeySerializer {
    pub fn to_bytes(sk: &SecretKey) -> Result<Zeroizing<Vec<u8>>> {
        let bytes = bincode::serialize(&SecretKeyData {
            coeffs: sk.coeffs.clone(),
        })
        .map_err(|e| ClientError::SecretKey(e.to_string()))?;
        Ok(Zeroizing::new(bytes))
    }

    pub fn from_bytes(bytes: &[u8], params: &Arc<BfvParameters>) -> Result<SecretKey> {
        let SecretKeyData { coeffs } =
            bincode::deserialize(bytes).map_err(|e| ClientError::SecretKey(e.to_string()))?;
        if coeffs.len() != params.degree() {
            return Err(ClientError::SecretKey(format!(
                "expected {} coefficients, got {}",
                params.degree(),
                coeffs.len()
            )));
        }
        Ok(SecretKey::new(coeffs.to_vec(), params))
    }
}
