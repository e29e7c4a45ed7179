// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use crate::helpers::{ensure_hex_zeroizing, telemetry::setup_simple_tracing};
use crate::{decrypt, encrypt, grants, init, keygen, read, submit};
use alloy::primitives::Address;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use fhc_config::load_config;
use fhc_fhe::{CiphertextHandle, CounterPreset, OpKind};
use std::path::PathBuf;
use tracing::{info, instrument, Level};
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(name = "fhc")]
#[command(
    about = "Operate an encrypted counter: submit ciphertexts, read state, inspect grants",
    long_about = None
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `fhc -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());
        let config = self.config.as_deref();

        match self.command {
            // Key generation may run before the counter is configured
            Commands::Keygen { out, preset } => {
                let preset = match preset {
                    Some(preset) => preset,
                    None => load_config(config)?.preset(),
                };
                keygen::execute(&out, preset)?
            }
            Commands::Init { deployer } => {
                init::execute(&counter_context(config)?, deployer).await?
            }
            Commands::Encrypt {
                value,
                caller,
                attestor_key,
            } => encrypt::execute(&counter_context(config)?, value, caller, attestor_key)?,
            Commands::Increment(args) => {
                submit::execute(&counter_context(config)?, OpKind::Add, args).await?
            }
            Commands::Decrement(args) => {
                submit::execute(&counter_context(config)?, OpKind::Subtract, args).await?
            }
            Commands::Read => read::execute(&counter_context(config)?)?,
            Commands::Decrypt {
                secret_key,
                ciphertext,
            } => decrypt::execute(&counter_context(config)?, &secret_key, ciphertext.as_deref())?,
            Commands::Grants { handle } => grants::list(&counter_context(config)?, &handle)?,
            Commands::IsGranted { handle, principal } => {
                grants::is_granted(&counter_context(config)?, &handle, &principal)?
            }
        }

        Ok(())
    }
}

fn counter_context(config_file: Option<&str>) -> Result<CounterContext> {
    let config = load_config(config_file)?;
    info!("Config loaded from: {:?}", config.config_file());
    CounterContext::new(config)
}

/// An external ciphertext and its input proof, both hex encoded
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Ciphertext produced by `fhc encrypt`
    #[arg(long)]
    pub ciphertext: String,

    /// Input proof produced by `fhc encrypt`
    #[arg(long)]
    pub proof: String,

    /// Address the submission is made under
    #[arg(long)]
    pub caller: Address,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a client key pair and write `sk.bin` and `pk.bin`
    Keygen {
        /// Directory to write the keys to
        #[arg(long)]
        out: PathBuf,

        /// Parameter preset. Defaults to the preset in the config file
        #[arg(long)]
        preset: Option<CounterPreset>,
    },

    /// Create the counter as an encryption of zero
    Init {
        /// Principal granted on the initial ciphertext
        #[arg(long)]
        deployer: Address,
    },

    /// Encrypt a value and attest it with a development input verifier key
    Encrypt {
        #[arg(long)]
        value: u32,

        /// Address the proof is bound to
        #[arg(long)]
        caller: Address,

        /// Input verifier private key
        #[arg(long = "attestor-key", value_parser = ensure_hex_zeroizing)]
        attestor_key: Zeroizing<String>,
    },

    /// Add an encrypted value to the counter
    Increment(SubmitArgs),

    /// Subtract an encrypted value from the counter
    Decrement(SubmitArgs),

    /// Print the current ciphertext and its handle
    Read,

    /// Decrypt a ciphertext off-chain with a client secret key
    Decrypt {
        /// Path to the secret key written by `fhc keygen`
        #[arg(long = "secret-key")]
        secret_key: PathBuf,

        /// Hex ciphertext. Defaults to the counter's current ciphertext
        #[arg(long)]
        ciphertext: Option<String>,
    },

    /// List principals granted on a ciphertext
    Grants {
        #[arg(long)]
        handle: CiphertextHandle,
    },

    /// Check whether a principal may decrypt a ciphertext
    IsGranted {
        #[arg(long)]
        handle: CiphertextHandle,

        #[arg(long)]
        principal: Address,
    },
}
