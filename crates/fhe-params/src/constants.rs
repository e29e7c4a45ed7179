// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Constants for the counter presets
//!
//! Every preset uses a plaintext modulus of 2^32 so that plaintext arithmetic in the BFV ring is
//! exactly wrapping `u32` arithmetic.

/// Plaintext modulus shared by every counter preset
pub const PLAINTEXT_MODULUS: u64 = 1 << 32;

/// Ciphertext moduli shared by every counter preset.
///
/// Two 57-bit NTT-friendly primes (both congruent to 1 mod 2^14), which keeps q/t at roughly
/// 2^82 and leaves a very large noise budget for long chains of additions and subtractions.
pub const MODULI: &[u64] = &[0x0100000002a20001, 0x0100000001760001];

/// Insecure preset constants (degree 2048) - DO NOT USE IN PRODUCTION
pub mod insecure_2048 {
    pub const DEGREE: usize = 2048;
    /// Rough classical security of the ring dimension and modulus chain
    pub const SECURITY_BITS: usize = 40;
}

/// Secure preset constants (degree 8192) - PRODUCTION READY
pub mod secure_8192 {
    pub const DEGREE: usize = 8192;
    pub const SECURITY_BITS: usize = 128;
}
