//! Turns recorded ledgers into replay units
//!
//! Emission walks each ledger in recorded order. A receiver contract gets one
//! fresh-instance construction per method body, emitted at first use, so the
//! replay topology matches the recording topology exactly.

use std::collections::HashMap;
use std::sync::Arc;

use crate::binding;
use crate::contract::{Contract, ServiceContract};
use crate::error::{Error, Result};
use crate::recording::{Argument, MethodLedger};

use super::program::{Operand, ReplayMethod, ReplayOp, ReplayUnit};

/// Emit one synthesized unit for a service contract from its ledgers.
///
/// Every stored call was validated when it was issued, so a call that cannot
/// be represented here is an internal consistency error, not a user-facing
/// one.
pub fn emit_unit(
    service: &ServiceContract,
    ledgers: &[MethodLedger],
    recordables: &HashMap<String, Arc<Contract>>,
    unit_name: &str,
) -> Result<ReplayUnit> {
    if ledgers.len() != service.methods().len() {
        return Err(Error::Internal(format!(
            "service {} declares {} methods but {} ledgers were recorded",
            service.name(),
            service.methods().len(),
            ledgers.len()
        )));
    }
    let mut methods = Vec::with_capacity(ledgers.len());
    for (name, ledger) in service.methods().iter().zip(ledgers) {
        if ledger.method() != name {
            return Err(Error::Internal(format!(
                "ledger {} emitted for service method {}",
                ledger.method(),
                name
            )));
        }
        methods.push(emit_method(name, ledger, recordables)?);
    }
    tracing::debug!("emitted unit {} ({} methods)", unit_name, methods.len());
    Ok(ReplayUnit {
        name: unit_name.to_string(),
        service: service.name().to_string(),
        methods,
    })
}

fn emit_method(
    name: &str,
    ledger: &MethodLedger,
    recordables: &HashMap<String, Arc<Contract>>,
) -> Result<ReplayMethod> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut ops = Vec::new();

    for call in ledger.calls() {
        let contract = recordables.get(call.contract()).ok_or_else(|| {
            Error::Internal(format!(
                "stored call against unregistered contract {}",
                call.contract()
            ))
        })?;
        let sig = contract.method(call.method()).ok_or_else(|| {
            Error::Internal(format!(
                "stored call to undeclared method {}.{}",
                call.contract(),
                call.method()
            ))
        })?;
        if sig.params.len() != call.args().len() {
            return Err(Error::Internal(format!(
                "stored call to {}.{} captured {} arguments for {} parameters",
                call.contract(),
                call.method(),
                call.args().len(),
                sig.params.len()
            )));
        }

        let slot = match slots.get(call.contract()) {
            Some(slot) => *slot,
            None => {
                let slot = slots.len();
                slots.insert(call.contract().to_string(), slot);
                ops.push(ReplayOp::Construct {
                    slot,
                    contract: call.contract().to_string(),
                });
                slot
            }
        };

        let mut args = Vec::with_capacity(call.args().len());
        for argument in call.args() {
            args.push(match argument {
                Argument::Literal(value) => Operand::Literal(value.clone()),
                Argument::ContextLookup(key) => {
                    binding::validate_key(key)?;
                    Operand::ContextLookup(key.clone())
                }
                Argument::ContextHandle => Operand::Context,
            });
        }

        let bind = sig.ret.binding.clone();
        if let Some(key) = &bind {
            binding::validate_key(key)?;
        }
        ops.push(ReplayOp::Invoke {
            slot,
            method: call.method().to_string(),
            args,
            bind,
        });
    }

    Ok(ReplayMethod {
        name: name.to_string(),
        ops,
    })
}
