// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Actor;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use fhc_acl::AclRepositoryFactory;
use fhc_bfv_client::{decrypt_u32, encrypt_u32, generate_keys, ClientKeys};
use fhc_config::load_config;
use fhc_counter::{
    CounterActor, CounterError, CounterParams, Decrement, EncryptedCounter, Increment, ReadCurrent,
};
use fhc_data::{DataStore, Repositories, SledStore};
use fhc_events::{
    new_event_bus_with_history, CounterEvent, CounterEventData, Event, InstanceId, RejectionKind,
    TakeEvents,
};
use fhc_fhe::{CiphertextCodec, CounterPreset};
use fhc_logger::SimpleLogger;
use fhc_proof::{InputAttestor, ProofContext, ProofVerifier, SignedInputVerifier};
use fhe::bfv::BfvParameters;
use figment::Jail;
use std::{path::Path, sync::Arc};

const DEPLOYER: Address = Address::repeat_byte(0xde);
const ALICE: Address = Address::repeat_byte(0xaa);
const BOB: Address = Address::repeat_byte(0xbb);

fn signer(seed: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)).unwrap()
}

fn instance() -> InstanceId {
    InstanceId::new(31337, Address::repeat_byte(0xcc))
}

/// Client keys, an input verifier committee and a way to build counters over any store
struct TestNetwork {
    params: Arc<BfvParameters>,
    keys: ClientKeys,
    attestors: Vec<PrivateKeySigner>,
    verifier: Arc<dyn ProofVerifier>,
}

impl TestNetwork {
    fn new(committee: u8, threshold: usize) -> Self {
        let params = CounterPreset::InsecureCounter2048.build_arc().unwrap();
        let keys = generate_keys(&params).unwrap();
        let attestors: Vec<_> = (1..=committee).map(signer).collect();
        let verifier =
            SignedInputVerifier::new(attestors.iter().map(|s| s.address()), threshold).unwrap();
        Self {
            params,
            keys,
            attestors,
            verifier: Arc::new(verifier),
        }
    }

    fn counter_params(&self, store: &DataStore) -> CounterParams {
        CounterParams {
            instance: instance(),
            params: self.params.clone(),
            verifier: self.verifier.clone(),
            repositories: Repositories::new(store.clone()),
        }
    }

    fn open(&self, store: &DataStore) -> Result<EncryptedCounter> {
        let (counter, _) = EncryptedCounter::open_or_initialize(
            self.counter_params(store),
            DEPLOYER,
            &self.keys.public_key,
        )?;
        Ok(counter)
    }

    /// Encrypt `value` and have the first `signers` attestors sign it for `caller`
    fn input(&self, value: u32, caller: Address, signers: usize) -> (Vec<u8>, Vec<u8>) {
        let raw = encrypt_u32(value, &self.keys.public_key, &self.params).unwrap();
        let encrypted = CiphertextCodec::new(self.params.clone())
            .decode(&raw)
            .unwrap();
        let proof = InputAttestor::new(self.attestors[..signers].to_vec())
            .attest(&encrypted, &ProofContext::new(caller, instance()))
            .unwrap();
        (raw, proof.to_bytes())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> u32 {
        decrypt_u32(&self.keys.secret_key, ciphertext, &self.params).unwrap()
    }
}

fn sled(path: &Path) -> Result<DataStore> {
    Ok(DataStore::from(Arc::new(SledStore::new(path, "counter")?)))
}

#[test]
fn two_principals_share_a_persistent_counter() -> Result<()> {
    let net = TestNetwork::new(1, 1);
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("db");

    let mut counter = net.open(&sled(&db)?)?;
    let initial = counter.current_handle();
    assert_eq!(net.decrypt(&counter.read_current()), 0);

    let (raw, proof) = net.input(5, ALICE, 1);
    let after_alice = counter.increment(&raw, &proof, ALICE)?;
    assert_eq!(net.decrypt(&after_alice.ciphertext), 5);

    let (raw, proof) = net.input(2, BOB, 1);
    let after_bob = counter.decrement(&raw, &proof, BOB)?;
    assert_eq!(net.decrypt(&after_bob.ciphertext), 3);

    // a fresh engine on the same database sees the same state and grants
    drop(counter);
    let reopened = net.open(&sled(&db)?)?;
    assert_eq!(reopened.current_handle(), after_bob.handle);
    assert_eq!(net.decrypt(&reopened.read_current()), 3);

    let engine = reopened.engine();
    assert!(reopened.is_granted(&initial, &DEPLOYER)?);
    assert!(reopened.is_granted(&after_alice.handle, &ALICE)?);
    assert!(reopened.is_granted(&after_alice.handle, &engine)?);
    assert!(reopened.is_granted(&after_bob.handle, &BOB)?);
    assert!(reopened.is_granted(&after_bob.handle, &engine)?);
    assert!(!reopened.is_granted(&after_bob.handle, &ALICE)?);
    assert!(!reopened.is_granted(&after_alice.handle, &BOB)?);

    let mut expected = vec![BOB, engine];
    expected.sort();
    assert_eq!(reopened.grantees(&after_bob.handle)?, expected);
    Ok(())
}

#[test]
fn rejected_submissions_do_not_touch_persisted_state() -> Result<()> {
    let net = TestNetwork::new(1, 1);
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("db");
    let store = sled(&db)?;
    let mut counter = net.open(&store)?;
    let handle = counter.current_handle();

    let (raw, proof) = net.input(5, ALICE, 1);
    let mut corrupted = raw.clone();
    corrupted[1] = 0x05;
    assert!(matches!(
        counter.increment(&corrupted, &proof, ALICE),
        Err(CounterError::MalformedCiphertext(_))
    ));
    assert!(matches!(
        counter.increment(&raw, &proof, BOB),
        Err(CounterError::InvalidProof)
    ));

    let reopened = net.open(&sled(&db)?)?;
    assert_eq!(reopened.current_handle(), handle);
    assert_eq!(net.decrypt(&reopened.read_current()), 0);

    let acl = Repositories::new(store).acl(&instance());
    assert!(!acl.is_granted(&handle, &ALICE)?);
    assert!(!acl.is_granted(&handle, &BOB)?);
    Ok(())
}

#[test]
fn proofs_need_a_threshold_of_distinct_verifiers() -> Result<()> {
    let net = TestNetwork::new(3, 2);
    let mut counter = net.open(&DataStore::in_mem())?;

    let (raw, proof) = net.input(4, ALICE, 1);
    let err = counter.increment(&raw, &proof, ALICE).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidProof);

    let (raw, proof) = net.input(4, ALICE, 2);
    let receipt = counter.increment(&raw, &proof, ALICE)?;
    assert_eq!(net.decrypt(&receipt.ciphertext), 4);
    Ok(())
}

#[actix::test]
async fn concurrent_submissions_are_serialized_by_the_actor() -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let net = TestNetwork::new(1, 1);
    let (bus, history) = new_event_bus_with_history::<CounterEvent>();
    SimpleLogger::<CounterEvent>::attach("test", bus.clone());

    let (counter, initialized) = EncryptedCounter::open_or_initialize(
        net.counter_params(&DataStore::in_mem()),
        DEPLOYER,
        &net.keys.public_key,
    )?;
    let addr = CounterActor::attach(counter, &bus, initialized);

    let callers: Vec<Address> = (1..=6u8).map(Address::repeat_byte).collect();
    let requests = callers.iter().enumerate().map(|(i, caller)| {
        let (ciphertext, proof) = net.input(i as u32 + 1, *caller, 1);
        let addr = addr.clone();
        let caller = *caller;
        async move {
            if i % 2 == 0 {
                addr.send(Increment {
                    ciphertext: ciphertext.into(),
                    proof: proof.into(),
                    caller,
                })
                .await
            } else {
                addr.send(Decrement {
                    ciphertext: ciphertext.into(),
                    proof: proof.into(),
                    caller,
                })
                .await
            }
        }
    });
    let receipts = futures::future::join_all(requests).await;

    let mut versions = vec![];
    for receipt in receipts {
        versions.push(receipt??.version);
    }
    versions.sort();
    assert_eq!(versions, (1..=6).collect::<Vec<u64>>());

    // 1 - 2 + 3 - 4 + 5 - 6
    let current = addr.send(ReadCurrent).await?;
    assert_eq!(net.decrypt(&current.ciphertext), 3u32.wrapping_neg());
    assert_eq!(current.version, 6);

    // init + 2 grants, then one update and two grants per submission
    let events = history.send(TakeEvents::new(3 + 6 * 3)).await?;
    let updates: Vec<_> = events
        .iter()
        .filter_map(|e| match e.get_data() {
            CounterEventData::CounterUpdated(data) => Some(data.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 6);
    assert_eq!(updates.last().map(|u| u.handle), Some(current.handle));
    for (expected, update) in updates.iter().enumerate() {
        assert_eq!(update.version, expected as u64 + 1);
    }
    assert_eq!(events[0].event_type(), "CounterInitialized");
    Ok(())
}

#[test]
fn counter_built_from_configuration() {
    Jail::expect_with(|jail| {
        let net = TestNetwork::new(1, 1);
        jail.create_binary("pk.bin", &net.keys.public_key)?;
        jail.create_file(
            "fhc.config.yaml",
            &format!(
                r#"
name: integration
data_dir: ./data
instance:
  chain_id: {}
  address: "{}"
fhe:
  preset: insecure-counter-2048
input_verifiers:
  signers: ["{}"]
  threshold: 1
"#,
                instance().chain_id(),
                instance().address(),
                signer(1).address()
            ),
        )?;

        let config = load_config(None).map_err(|e| e.to_string())?;
        assert_eq!(config.instance(), instance());
        assert_eq!(config.preset(), CounterPreset::InsecureCounter2048);

        let public_key = std::fs::read(config.public_key_file()).map_err(|e| e.to_string())?;
        let verifier = SignedInputVerifier::new(
            config.input_verifiers().signers.iter().copied(),
            config.input_verifiers().threshold,
        )
        .map_err(|e| e.to_string())?;
        let store = sled(config.db_file()).map_err(|e| e.to_string())?;
        let params = CounterParams {
            instance: config.instance(),
            params: config.preset().build_arc().map_err(|e| e.to_string())?,
            verifier: Arc::new(verifier),
            repositories: Repositories::new(store),
        };
        let (mut counter, initialized) =
            EncryptedCounter::open_or_initialize(params, DEPLOYER, &public_key)
                .map_err(|e| e.to_string())?;
        assert!(initialized.is_some());

        let (raw, proof) = net.input(11, ALICE, 1);
        let receipt = counter
            .increment(&raw, &proof, ALICE)
            .map_err(|e| e.to_string())?;
        assert_eq!(net.decrypt(&receipt.ciphertext), 11);
        assert!(config.db_file().starts_with(jail.directory().join("data")));
        Ok(())
    });
}
