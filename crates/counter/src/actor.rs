// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CounterError, EncryptedCounter, SubmitReceipt};
use actix::prelude::*;
use alloy_primitives::Address;
use fhc_events::{
    AccessGranted, CounterEvent, CounterInitialized, CounterUpdated, EventBus, InstanceId,
    SubmissionRejected,
};
use fhc_fhe::{CiphertextHandle, OpKind};
use fhc_utils::ArcBytes;
use tracing::{debug, error};

/// Add an external ciphertext to the counter
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<SubmitReceipt, CounterError>")]
pub struct Increment {
    pub ciphertext: ArcBytes,
    pub proof: ArcBytes,
    pub caller: Address,
}

/// Subtract an external ciphertext from the counter
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<SubmitReceipt, CounterError>")]
pub struct Decrement {
    pub ciphertext: ArcBytes,
    pub proof: ArcBytes,
    pub caller: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "CurrentCiphertext")]
pub struct ReadCurrent;

#[derive(MessageResponse, Clone, Debug, PartialEq, Eq)]
pub struct CurrentCiphertext {
    pub instance: InstanceId,
    pub version: u64,
    pub handle: CiphertextHandle,
    pub ciphertext: ArcBytes,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<bool>")]
pub struct IsGranted {
    pub handle: CiphertextHandle,
    pub principal: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<Vec<Address>>")]
pub struct GetGrantees {
    pub handle: CiphertextHandle,
}

/// Serializes access to one [`EncryptedCounter`] and publishes what happens to it.
///
/// The mailbox handles one message at a time, so submissions on the same instance never
/// interleave.
pub struct CounterActor {
    counter: EncryptedCounter,
    bus: Addr<EventBus<CounterEvent>>,
    initialized: Option<CounterInitialized>,
}

impl CounterActor {
    pub fn new(
        counter: EncryptedCounter,
        bus: Addr<EventBus<CounterEvent>>,
        initialized: Option<CounterInitialized>,
    ) -> Self {
        Self {
            counter,
            bus,
            initialized,
        }
    }

    pub fn attach(
        counter: EncryptedCounter,
        bus: &Addr<EventBus<CounterEvent>>,
        initialized: Option<CounterInitialized>,
    ) -> Addr<Self> {
        Self::new(counter, bus.clone(), initialized).start()
    }

    fn submit(
        &mut self,
        ciphertext: &[u8],
        proof: &[u8],
        caller: Address,
        op: OpKind,
    ) -> Result<SubmitReceipt, CounterError> {
        match self.counter.submit(ciphertext, proof, caller, op) {
            Ok(receipt) => {
                self.publish_receipt(&receipt, caller);
                Ok(receipt)
            }
            Err(err) => {
                self.bus.do_send(CounterEvent::from(SubmissionRejected {
                    instance: self.counter.instance(),
                    caller,
                    op,
                    reason: err.kind(),
                }));
                Err(err)
            }
        }
    }

    fn publish_receipt(&self, receipt: &SubmitReceipt, caller: Address) {
        self.bus.do_send(CounterEvent::from(CounterUpdated {
            instance: receipt.instance,
            version: receipt.version,
            op: receipt.op,
            handle: receipt.handle,
            ciphertext: receipt.ciphertext.clone(),
            caller,
        }));
        for principal in &receipt.grantees {
            self.bus.do_send(CounterEvent::from(AccessGranted {
                instance: receipt.instance,
                handle: receipt.handle,
                principal: *principal,
            }));
        }
    }
}

impl Actor for CounterActor {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        debug!(instance = %self.counter.instance(), "counter actor started");
        let Some(event) = self.initialized.take() else {
            return;
        };
        let (instance, handle) = (event.instance, event.handle);
        self.bus.do_send(CounterEvent::from(event));
        match self.counter.grantees(&handle) {
            Ok(principals) => {
                for principal in principals {
                    self.bus.do_send(CounterEvent::from(AccessGranted {
                        instance,
                        handle,
                        principal,
                    }));
                }
            }
            Err(err) => error!(%instance, %handle, "could not list initial grants: {err:#}"),
        }
    }
}

impl Handler<Increment> for CounterActor {
    type Result = Result<SubmitReceipt, CounterError>;

    fn handle(&mut self, msg: Increment, _: &mut Self::Context) -> Self::Result {
        self.submit(&msg.ciphertext, &msg.proof, msg.caller, OpKind::Add)
    }
}

impl Handler<Decrement> for CounterActor {
    type Result = Result<SubmitReceipt, CounterError>;

    fn handle(&mut self, msg: Decrement, _: &mut Self::Context) -> Self::Result {
        self.submit(&msg.ciphertext, &msg.proof, msg.caller, OpKind::Subtract)
    }
}

impl Handler<ReadCurrent> for CounterActor {
    type Result = CurrentCiphertext;

    fn handle(&mut self, _: ReadCurrent, _: &mut Self::Context) -> Self::Result {
        CurrentCiphertext {
            instance: self.counter.instance(),
            version: self.counter.version(),
            handle: self.counter.current_handle(),
            ciphertext: self.counter.read_current(),
        }
    }
}

impl Handler<IsGranted> for CounterActor {
    type Result = anyhow::Result<bool>;

    fn handle(&mut self, msg: IsGranted, _: &mut Self::Context) -> Self::Result {
        self.counter.is_granted(&msg.handle, &msg.principal)
    }
}

impl Handler<GetGrantees> for CounterActor {
    type Result = anyhow::Result<Vec<Address>>;

    fn handle(&mut self, msg: GetGrantees, _: &mut Self::Context) -> Self::Result {
        self.counter.grantees(&msg.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{harness, instance, ALICE, BOB, DEPLOYER};
    use fhc_data::DataStore;
    use fhc_events::{
        new_event_bus_with_history, CounterEventData, Event, RejectionKind, TakeEvents,
    };

    fn event_types(events: &[CounterEvent]) -> Vec<String> {
        events.iter().map(|e| e.event_type()).collect()
    }

    #[actix::test]
    async fn publishes_initialization_updates_and_rejections() -> anyhow::Result<()> {
        let h = harness();
        let (bus, history) = new_event_bus_with_history::<CounterEvent>();
        let (counter, initialized) = EncryptedCounter::open_or_initialize(
            h.counter_params(&DataStore::in_mem()),
            DEPLOYER,
            &h.keys.public_key,
        )?;
        let engine = counter.engine();
        let addr = CounterActor::attach(counter, &bus, initialized);

        let events = history.send(TakeEvents::new(3)).await?;
        assert_eq!(
            event_types(&events),
            vec!["CounterInitialized", "AccessGranted", "AccessGranted"]
        );
        let CounterEventData::CounterInitialized(init) = events[0].get_data() else {
            panic!("expected CounterInitialized");
        };
        assert_eq!(init.deployer, DEPLOYER);

        let (raw, proof) = h.input(5, ALICE);
        let receipt = addr
            .send(Increment {
                ciphertext: raw.into(),
                proof: proof.into(),
                caller: ALICE,
            })
            .await??;
        assert_eq!(receipt.version, 1);

        let events = history.send(TakeEvents::new(3)).await?;
        let CounterEventData::CounterUpdated(updated) = events[0].get_data() else {
            panic!("expected CounterUpdated");
        };
        assert_eq!(updated.handle, receipt.handle);
        assert_eq!(updated.caller, ALICE);
        assert_eq!(updated.op, OpKind::Add);
        assert_eq!(h.decrypt(&updated.ciphertext), 5);
        let granted: Vec<_> = events[1..]
            .iter()
            .map(|e| match e.get_data() {
                CounterEventData::AccessGranted(g) => (g.handle, g.principal),
                other => panic!("unexpected event {other}"),
            })
            .collect();
        assert!(granted.contains(&(receipt.handle, ALICE)));
        assert!(granted.contains(&(receipt.handle, engine)));

        let (raw, proof) = h.input(2, ALICE);
        let err = addr
            .send(Decrement {
                ciphertext: raw.into(),
                proof: proof.into(),
                caller: BOB,
            })
            .await?
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidProof);

        let events = history.send(TakeEvents::new(1)).await?;
        assert_eq!(
            events[0].get_data(),
            &CounterEventData::SubmissionRejected(SubmissionRejected {
                instance: instance(),
                caller: BOB,
                op: OpKind::Subtract,
                reason: RejectionKind::InvalidProof,
            })
        );
        Ok(())
    }

    #[actix::test]
    async fn queries_go_through_the_mailbox() -> anyhow::Result<()> {
        let h = harness();
        let bus = EventBus::<CounterEvent>::new().start();
        let addr = CounterActor::attach(h.open(&DataStore::in_mem()), &bus, None);

        let before = addr.send(ReadCurrent).await?;
        assert_eq!(before.version, 0);
        assert_eq!(h.decrypt(&before.ciphertext), 0);

        let (raw, proof) = h.input(7, BOB);
        addr.send(Decrement {
            ciphertext: raw.into(),
            proof: proof.into(),
            caller: BOB,
        })
        .await??;

        let after = addr.send(ReadCurrent).await?;
        assert_eq!(after.version, 1);
        assert_eq!(h.decrypt(&after.ciphertext), 7u32.wrapping_neg());
        assert!(
            addr.send(IsGranted {
                handle: after.handle,
                principal: BOB,
            })
            .await??
        );
        assert!(
            !addr
                .send(IsGranted {
                    handle: before.handle,
                    principal: BOB,
                })
                .await??
        );
        let mut expected = vec![BOB, instance().address()];
        expected.sort();
        assert_eq!(
            addr.send(GetGrantees {
                handle: after.handle
            })
            .await??,
            expected
        );
        Ok(())
    }
}
