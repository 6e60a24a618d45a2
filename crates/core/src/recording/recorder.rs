//! Recording sessions: one ledger per service-contract method

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::contract::{Contract, ServiceContract};
use crate::emit::{self, ReplayUnit};
use crate::error::{Error, Result};
use crate::naming::NameAllocator;
use crate::sink::Sink;

use super::ledger::MethodLedger;
use super::proxy::RecordingProxy;
use super::validate::Rejection;

#[derive(Debug)]
pub(crate) enum Phase {
    Open,
    Aborted(Rejection),
    Closed,
}

#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) unit_name: String,
    pub(crate) service: ServiceContract,
    pub(crate) ledgers: Vec<MethodLedger>,
    pub(crate) recordables: HashMap<String, Arc<Contract>>,
    pub(crate) phase: Phase,
}

/// One build-time recording session.
///
/// A recorder owns exactly one [`MethodLedger`] per method of its service
/// contract. Recording is synchronous and single-threaded; independent
/// sessions share nothing. `finish` consumes the recorder, emits the unit and
/// hands it to the sink exactly once; dropping an unfinished recorder
/// discards the session with a warning and writes nothing.
pub struct Recorder {
    session: Rc<RefCell<Session>>,
}

impl Recorder {
    pub fn new(names: &mut NameAllocator, build_step: &str, service: ServiceContract) -> Recorder {
        let unit_name = names.allocate(build_step);
        let ledgers = service
            .methods()
            .iter()
            .map(|m| MethodLedger::new(m.as_str()))
            .collect();
        tracing::debug!(
            "opened recording session {} for service {}",
            unit_name,
            service.name()
        );
        Recorder {
            session: Rc::new(RefCell::new(Session {
                unit_name,
                service,
                ledgers,
                recordables: HashMap::new(),
                phase: Phase::Open,
            })),
        }
    }

    /// Name of the unit this session will emit
    pub fn unit_name(&self) -> String {
        self.session.borrow().unit_name.clone()
    }

    /// True when no call has been recorded on any ledger
    pub fn is_empty(&self) -> bool {
        self.session.borrow().ledgers.iter().all(|l| l.is_empty())
    }

    /// Make a contract known to the session without creating a proxy, so
    /// chained returns naming it can resolve
    pub fn register_contract(&self, contract: &Arc<Contract>) -> Result<()> {
        let mut session = self.session.borrow_mut();
        if !matches!(session.phase, Phase::Open) {
            return Err(Error::StaleSession {
                unit: session.unit_name.clone(),
            });
        }
        register(&mut session, contract)?;
        Ok(())
    }

    /// The ledger of the service contract's sole method
    pub fn method_ledger(&self) -> Result<MethodLedgerRef> {
        let session = self.session.borrow();
        if !matches!(session.phase, Phase::Open) {
            return Err(Error::StaleSession {
                unit: session.unit_name.clone(),
            });
        }
        match session.service.methods().len() {
            1 => Ok(MethodLedgerRef {
                session: Rc::clone(&self.session),
                index: 0,
            }),
            count => Err(Error::AmbiguousMethod {
                service: session.service.name().to_string(),
                count,
            }),
        }
    }

    /// The ledger of a named service-contract method
    pub fn method_ledger_named(&self, method: &str) -> Result<MethodLedgerRef> {
        let session = self.session.borrow();
        if !matches!(session.phase, Phase::Open) {
            return Err(Error::StaleSession {
                unit: session.unit_name.clone(),
            });
        }
        let index = session
            .service
            .methods()
            .iter()
            .position(|m| m == method)
            .ok_or_else(|| Error::UnknownMethod {
                contract: session.service.name().to_string(),
                method: method.to_string(),
            })?;
        Ok(MethodLedgerRef {
            session: Rc::clone(&self.session),
            index,
        })
    }

    /// Shorthand: a recording proxy on the sole method's ledger
    pub fn recording_proxy(&self, contract: &Arc<Contract>) -> Result<RecordingProxy> {
        self.method_ledger()?.recording_proxy(contract)
    }

    /// Close the session: emit the replay unit, hand its bytes to the sink
    /// and return it. A session aborted by a validation error refuses with
    /// the original error and writes nothing.
    pub fn finish(self, sink: &mut dyn Sink) -> Result<ReplayUnit> {
        let result = {
            let mut session = self.session.borrow_mut();
            match std::mem::replace(&mut session.phase, Phase::Closed) {
                Phase::Aborted(rejection) => {
                    tracing::debug!(
                        "session {} closed on error path, nothing written",
                        session.unit_name
                    );
                    Err(rejection.into())
                }
                Phase::Closed => Err(Error::StaleSession {
                    unit: session.unit_name.clone(),
                }),
                Phase::Open => {
                    let unit = emit::emit_unit(
                        &session.service,
                        &session.ledgers,
                        &session.recordables,
                        &session.unit_name,
                    )?;
                    let bytes = unit.to_bytes()?;
                    sink.write(&session.unit_name, &bytes)?;
                    tracing::debug!(
                        "closed recording session {}, wrote {} bytes",
                        session.unit_name,
                        bytes.len()
                    );
                    Ok(unit)
                }
            }
        };
        result
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        let mut session = self.session.borrow_mut();
        if matches!(session.phase, Phase::Open) {
            tracing::warn!(
                "recording session {} dropped without finish, nothing written",
                session.unit_name
            );
            session.phase = Phase::Closed;
        }
    }
}

/// Handle to the ledger of one service-contract method
#[derive(Debug)]
pub struct MethodLedgerRef {
    session: Rc<RefCell<Session>>,
    index: usize,
}

impl MethodLedgerRef {
    pub fn method(&self) -> String {
        self.session.borrow().ledgers[self.index].method().to_string()
    }

    /// A recording proxy for the given contract on this ledger. Repeated
    /// requests for the same contract return the same proxy, so sequential
    /// calls against "one logical object" accumulate into one ledger.
    pub fn recording_proxy(&self, contract: &Arc<Contract>) -> Result<RecordingProxy> {
        let mut session = self.session.borrow_mut();
        if !matches!(session.phase, Phase::Open) {
            return Err(Error::StaleSession {
                unit: session.unit_name.clone(),
            });
        }
        let registered = register(&mut session, contract)?;
        let first = session.ledgers[self.index].note_recordable(registered.name());
        if first {
            tracing::debug!(
                "created recording proxy for {} on ledger {}",
                registered.name(),
                session.ledgers[self.index].method()
            );
        } else {
            tracing::trace!("reusing recording proxy for {}", registered.name());
        }
        drop(session);
        Ok(RecordingProxy::new(
            Rc::clone(&self.session),
            self.index,
            registered,
        ))
    }
}

fn register(session: &mut Session, contract: &Arc<Contract>) -> Result<Arc<Contract>> {
    match session.recordables.get(contract.name()) {
        Some(existing) => {
            if **existing != **contract {
                return Err(Error::Internal(format!(
                    "conflicting declarations for contract {}",
                    contract.name()
                )));
            }
            Ok(Arc::clone(existing))
        }
        None => {
            session
                .recordables
                .insert(contract.name().to_string(), Arc::clone(contract));
            Ok(Arc::clone(contract))
        }
    }
}
