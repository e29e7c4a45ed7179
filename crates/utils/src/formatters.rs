// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use core::fmt;

/// Custom formatter function for hex display of potentially large ciphertexts
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(hex::encode(data)))
}

/// Parse a hex string with or without a `0x` prefix
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(stripped).with_context(|| {
        format!(
            "Invalid hex input ({} chars)",
            stripped.len()
        )
    })
}

/// Encode bytes as a `0x` prefixed hex string
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// truncate a string
fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len(), start, end)
    }
}
