// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Preset definitions and builders for the BFV parameters backing the encrypted counter.

pub mod builder;
pub mod constants;
pub mod presets;

pub use builder::{build_bfv_params, build_bfv_params_arc};
pub use presets::{BfvParamSet, CounterPreset, PresetError, PresetMetadata, DEFAULT_PRESET};
