// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod arithmetic;
mod codec;
mod handle;

pub use arithmetic::*;
pub use codec::*;
pub use handle::*;

pub use fhc_fhe_params::{
    build_bfv_params, build_bfv_params_arc, BfvParamSet, CounterPreset, PresetError,
    PresetMetadata, DEFAULT_PRESET,
};
