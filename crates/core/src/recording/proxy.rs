//! Recording proxies: call interception without execution
//!
//! A proxy implements a declared contract as a dispatch table routed through
//! one recording function. No real target object exists at build time; the
//! only side effect of a call is one more entry in the ledger.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::contract::{ArgValue, Contract, ReturnType, Value};
use crate::error::{Error, Result};

use super::ledger::StoredCall;
use super::recorder::{Phase, Session};
use super::validate::validate_argument;

/// What a recorded call hands back to build-time code
#[derive(Debug)]
pub enum CallOutcome {
    /// The declared zero value for a primitive return, so build-time code
    /// that uses the "result" keeps executing
    Default(Value),
    /// A recording proxy for the returned contract; calls on it accumulate
    /// into the same ledger, so fluent chains keep recording
    Chained(RecordingProxy),
    /// Nothing usable; the call exists only in the ledger
    Absent,
}

impl CallOutcome {
    pub fn chained(self) -> Option<RecordingProxy> {
        match self {
            CallOutcome::Chained(proxy) => Some(proxy),
            _ => None,
        }
    }

    pub fn default_value(self) -> Option<Value> {
        match self {
            CallOutcome::Default(value) => Some(value),
            _ => None,
        }
    }
}

/// A recording proxy for one contract on one method ledger.
///
/// Handles are cheap and cloneable; two proxies for the same contract from
/// the same ledger compare equal and feed the same call sequence.
pub struct RecordingProxy {
    session: Rc<RefCell<Session>>,
    ledger: usize,
    contract: Arc<Contract>,
}

impl RecordingProxy {
    pub(crate) fn new(session: Rc<RefCell<Session>>, ledger: usize, contract: Arc<Contract>) -> Self {
        Self {
            session,
            ledger,
            contract,
        }
    }

    pub fn contract_name(&self) -> &str {
        self.contract.name()
    }

    /// Record one call. Arguments are validated immediately; a rejected
    /// argument aborts the whole session and nothing is appended.
    pub fn call(&self, method: &str, args: Vec<ArgValue>) -> Result<CallOutcome> {
        {
            let session = self.session.borrow();
            if !matches!(session.phase, Phase::Open) {
                return Err(Error::StaleSession {
                    unit: session.unit_name.clone(),
                });
            }
        }

        let sig = self
            .contract
            .method(method)
            .ok_or_else(|| Error::UnknownMethod {
                contract: self.contract.name().to_string(),
                method: method.to_string(),
            })?;
        if sig.params.len() != args.len() {
            return Err(Error::ArityMismatch {
                contract: self.contract.name().to_string(),
                method: method.to_string(),
                expected: sig.params.len(),
                actual: args.len(),
            });
        }

        let mut captured = Vec::with_capacity(args.len());
        for (index, (param, candidate)) in sig.params.iter().zip(&args).enumerate() {
            match validate_argument(self.contract.name(), method, index, param, candidate) {
                Ok(argument) => captured.push(argument),
                Err(rejection) => {
                    let mut session = self.session.borrow_mut();
                    tracing::debug!(
                        "recording aborted: {}.{} parameter {} ({})",
                        rejection.contract,
                        rejection.method,
                        rejection.index,
                        candidate.describe()
                    );
                    session.phase = Phase::Aborted(rejection.clone());
                    return Err(rejection.into());
                }
            }
        }

        let mut session = self.session.borrow_mut();
        session.ledgers[self.ledger].append(StoredCall::new(
            self.contract.name(),
            method,
            captured,
        ));
        tracing::trace!(
            "recorded {}.{} on ledger {}",
            self.contract.name(),
            method,
            session.ledgers[self.ledger].method()
        );

        let outcome = if let Some(zero) = sig.ret.ty.zero() {
            CallOutcome::Default(zero)
        } else if let ReturnType::Chained(target) = &sig.ret.ty {
            match session.recordables.get(target).cloned() {
                Some(contract) => {
                    session.ledgers[self.ledger].note_recordable(contract.name());
                    CallOutcome::Chained(RecordingProxy::new(
                        Rc::clone(&self.session),
                        self.ledger,
                        contract,
                    ))
                }
                None => CallOutcome::Absent,
            }
        } else {
            CallOutcome::Absent
        };
        Ok(outcome)
    }
}

impl Clone for RecordingProxy {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            ledger: self.ledger,
            contract: Arc::clone(&self.contract),
        }
    }
}

impl PartialEq for RecordingProxy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session)
            && self.ledger == other.ledger
            && self.contract.name() == other.contract.name()
    }
}

impl fmt::Debug for RecordingProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingProxy")
            .field("contract", &self.contract.name())
            .field("ledger", &self.ledger)
            .finish()
    }
}
