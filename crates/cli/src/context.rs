// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::{anyhow, Context, Result};
use fhc_config::AppConfig;
use fhc_counter::{CounterParams, EncryptedCounter};
use fhc_data::{DataStore, InMemStore, Repositories, SledStore};
use fhc_events::CounterInitialized;
use fhc_proof::SignedInputVerifier;
use fhe::bfv::BfvParameters;
use std::{fs, sync::Arc};
use tracing::debug;

/// Everything a command needs to reach the counter described by the config
pub struct CounterContext {
    config: AppConfig,
    params: Arc<BfvParameters>,
    repositories: Repositories,
}

impl CounterContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let params = config
            .preset()
            .build_arc()
            .with_context(|| format!("Could not build parameters for {}", config.preset()))?;

        let store = if config.in_mem() {
            debug!("using in memory store");
            DataStore::from(Arc::new(InMemStore::new(false)))
        } else {
            DataStore::from(Arc::new(SledStore::new(config.db_file(), "counter")?))
        };

        Ok(Self {
            config,
            params,
            repositories: Repositories::new(store),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn params(&self) -> &Arc<BfvParameters> {
        &self.params
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    pub fn public_key(&self) -> Result<Vec<u8>> {
        let path = self.config.public_key_file();
        fs::read(path).with_context(|| format!("Could not read public key at {:?}", path))
    }

    fn counter_params(&self) -> Result<CounterParams> {
        let verifiers = self.config.input_verifiers();
        let verifier =
            SignedInputVerifier::new(verifiers.signers.iter().copied(), verifiers.threshold)?;
        Ok(CounterParams {
            instance: self.config.instance(),
            params: self.params.clone(),
            verifier: Arc::new(verifier),
            repositories: self.repositories.clone(),
        })
    }

    /// Open the configured counter. Fails when it has not been initialized.
    pub fn open(&self) -> Result<EncryptedCounter> {
        EncryptedCounter::open(self.counter_params()?)?.ok_or_else(|| {
            anyhow!(
                "Counter {} is not initialized. Run `fhc init --deployer <address>` first.",
                self.config.instance()
            )
        })
    }

    pub fn open_or_initialize(
        &self,
        deployer: Address,
    ) -> Result<(EncryptedCounter, Option<CounterInitialized>)> {
        EncryptedCounter::open_or_initialize(self.counter_params()?, deployer, &self.public_key()?)
    }
}
