// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CounterError, CounterRepositoryFactory};
use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use fhc_acl::{AccessControlRegistry, AclRepositoryFactory};
use fhc_data::{Repositories, Repository, StaleValue, WriteBatch};
use fhc_events::{CounterInitialized, InstanceId};
use fhc_fhe::{CiphertextCodec, CiphertextHandle, EncryptedU32, HomomorphicUnit, OpKind};
use fhc_proof::{ProofContext, ProofVerifier};
use fhc_utils::ArcBytes;
use fhe::bfv::{BfvParameters, Encoding, Plaintext, PublicKey};
use fhe_traits::{DeserializeParametrized, FheEncoder, FheEncrypter};
use rand::thread_rng;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{error, info, warn};

pub struct CounterParams {
    pub instance: InstanceId,
    pub params: Arc<BfvParameters>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub repositories: Repositories,
}

/// Outcome of an admitted submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub instance: InstanceId,
    /// In-memory version after the submit. Starts at 0 when the counter is opened.
    pub version: u64,
    pub op: OpKind,
    pub handle: CiphertextHandle,
    pub ciphertext: ArcBytes,
    /// Principals granted on the new ciphertext, sorted
    pub grantees: Vec<Address>,
}

/// Holds the single live ciphertext of one counter instance.
///
/// Mutation goes through `&mut self`, so each submit runs to completion before the next one
/// starts. State and grants for a new ciphertext are committed in one batch before the in-memory
/// cell is swapped; a rejected or failed submit leaves both untouched. The batch only commits if
/// the stored slot still holds the ciphertext this counter combined against, so a second counter
/// on the same store cannot overwrite an update it has not seen.
pub struct EncryptedCounter {
    instance: InstanceId,
    codec: CiphertextCodec,
    unit: HomomorphicUnit,
    verifier: Arc<dyn ProofVerifier>,
    acl: AccessControlRegistry,
    slot: Repository<ArcBytes>,
    current: EncryptedU32,
    version: u64,
}

impl EncryptedCounter {
    fn assemble(params: CounterParams, current: EncryptedU32) -> Self {
        let codec = CiphertextCodec::new(params.params);
        Self {
            instance: params.instance,
            unit: HomomorphicUnit::new(codec.clone()),
            codec,
            verifier: params.verifier,
            acl: params.repositories.acl(&params.instance),
            slot: params.repositories.counter(&params.instance),
            current,
            version: 0,
        }
    }

    /// Load a previously initialized instance. Returns `None` when the slot is empty.
    pub fn open(params: CounterParams) -> Result<Option<Self>> {
        let slot = params.repositories.counter(&params.instance);
        let Some(bytes) = slot.read()? else {
            return Ok(None);
        };

        let current = CiphertextCodec::new(params.params.clone())
            .decode(&bytes)
            .with_context(|| format!("Stored counter state for {} is corrupt", params.instance))?;

        info!(instance = %params.instance, handle = %current.handle(), "opened counter");
        Ok(Some(Self::assemble(params, current)))
    }

    /// Create the instance as an encryption of zero under `public_key`.
    ///
    /// The engine and `deployer` are granted on the initial ciphertext in the same commit as the
    /// slot write.
    pub fn initialize(
        params: CounterParams,
        deployer: Address,
        public_key: &[u8],
    ) -> Result<(Self, CounterInitialized)> {
        let pk = PublicKey::from_bytes(public_key, &params.params)
            .map_err(|e| anyhow!("Could not deserialize public key: {e}"))?;

        let zero = vec![0u64];
        let pt = Plaintext::try_encode(&zero, Encoding::poly(), &params.params)
            .map_err(|e| anyhow!("Could not encode initial state: {e}"))?;
        let ct = pk
            .try_encrypt(&pt, &mut thread_rng())
            .map_err(|e| anyhow!("Could not encrypt initial state: {e}"))?;

        let instance = params.instance;
        let current = CiphertextCodec::new(params.params.clone()).wrap(ct);
        let counter = Self::assemble(params, current);

        let mut batch = WriteBatch::new();
        counter.slot.stage_expect(&mut batch, None)?;
        counter.slot.stage(&mut batch, counter.current.bytes())?;
        counter.stage_grants(&mut batch, &counter.current.handle(), deployer)?;
        counter
            .slot
            .commit(batch)
            .with_context(|| format!("Could not initialize counter {instance}"))?;

        info!(%instance, handle = %counter.current.handle(), %deployer, "initialized counter");
        let event = CounterInitialized {
            instance,
            handle: counter.current.handle(),
            ciphertext: counter.current.bytes().clone(),
            deployer,
        };
        Ok((counter, event))
    }

    /// Open the instance or initialize it if nothing was stored yet.
    pub fn open_or_initialize(
        params: CounterParams,
        deployer: Address,
        public_key: &[u8],
    ) -> Result<(Self, Option<CounterInitialized>)> {
        let slot = params.repositories.counter(&params.instance);
        if slot.read()?.is_some() {
            let counter = Self::open(params)?
                .ok_or_else(|| anyhow!("Counter state vanished while opening"))?;
            return Ok((counter, None));
        }
        let (counter, event) = Self::initialize(params, deployer, public_key)?;
        Ok((counter, Some(event)))
    }

    pub fn increment(
        &mut self,
        raw: &[u8],
        proof: &[u8],
        caller: Address,
    ) -> Result<SubmitReceipt, CounterError> {
        self.submit(raw, proof, caller, OpKind::Add)
    }

    pub fn decrement(
        &mut self,
        raw: &[u8],
        proof: &[u8],
        caller: Address,
    ) -> Result<SubmitReceipt, CounterError> {
        self.submit(raw, proof, caller, OpKind::Subtract)
    }

    /// Admit `raw` as an operand and replace the current ciphertext with `current op raw`.
    pub fn submit(
        &mut self,
        raw: &[u8],
        proof: &[u8],
        caller: Address,
        op: OpKind,
    ) -> Result<SubmitReceipt, CounterError> {
        let result = self.apply(raw, proof, caller, op);
        if let Err(err) = &result {
            match err {
                CounterError::Storage(_) => {
                    error!(instance = %self.instance, %caller, %op, "{err}")
                }
                _ => warn!(instance = %self.instance, %caller, %op, "rejected submission: {err}"),
            }
        }
        result
    }

    fn apply(
        &mut self,
        raw: &[u8],
        proof: &[u8],
        caller: Address,
        op: OpKind,
    ) -> Result<SubmitReceipt, CounterError> {
        let operand = self.codec.decode(raw)?;

        let context = ProofContext::new(caller, self.instance);
        if !self.verifier.verify(&operand, proof, &context) {
            return Err(CounterError::InvalidProof);
        }

        let next = self.unit.combine(op, &self.current, &operand)?;
        let handle = next.handle();

        let mut batch = WriteBatch::new();
        self.slot
            .stage_expect(&mut batch, Some(self.current.bytes()))
            .map_err(CounterError::Storage)?;
        self.slot
            .stage(&mut batch, next.bytes())
            .map_err(CounterError::Storage)?;
        let grantees = self
            .stage_grants(&mut batch, &handle, caller)
            .map_err(CounterError::Storage)?;
        if let Err(err) = self.slot.commit(batch) {
            if err.downcast_ref::<StaleValue>().is_some() {
                self.reload();
            }
            return Err(CounterError::Storage(err));
        }

        self.current = next;
        self.version += 1;

        info!(
            instance = %self.instance,
            %handle,
            %caller,
            %op,
            version = self.version,
            "counter updated"
        );

        Ok(SubmitReceipt {
            instance: self.instance,
            version: self.version,
            op,
            handle,
            ciphertext: self.current.bytes().clone(),
            grantees,
        })
    }

    /// Replace the in-memory cell with whatever another writer committed to the slot
    fn reload(&mut self) {
        let stored = self.slot.read().and_then(|bytes| {
            let bytes = bytes.ok_or_else(|| anyhow!("Counter state is missing"))?;
            Ok(self.codec.decode(&bytes)?)
        });
        match stored {
            Ok(current) => {
                warn!(
                    instance = %self.instance,
                    stale = %self.current.handle(),
                    handle = %current.handle(),
                    "reloaded counter state committed by another writer"
                );
                self.current = current;
            }
            Err(err) => {
                error!(instance = %self.instance, "Could not reload counter state: {err:#}")
            }
        }
    }

    /// Stage grants for the engine and `principal` on `handle`
    fn stage_grants(
        &self,
        batch: &mut WriteBatch,
        handle: &CiphertextHandle,
        principal: Address,
    ) -> Result<Vec<Address>> {
        let grantees: BTreeSet<Address> = [self.engine(), principal].into_iter().collect();
        for grantee in &grantees {
            self.acl.stage_grant(batch, handle, grantee)?;
        }
        Ok(grantees.into_iter().collect())
    }

    /// Principal the engine itself acts under
    pub fn engine(&self) -> Address {
        self.instance.address()
    }

    /// Current ciphertext in its canonical wire encoding. No access check.
    pub fn read_current(&self) -> ArcBytes {
        self.current.bytes().clone()
    }

    pub fn current_handle(&self) -> CiphertextHandle {
        self.current.handle()
    }

    pub fn is_granted(&self, handle: &CiphertextHandle, principal: &Address) -> Result<bool> {
        self.acl.is_granted(handle, principal)
    }

    pub fn grantees(&self, handle: &CiphertextHandle) -> Result<Vec<Address>> {
        self.acl.grantees(handle)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }
}
