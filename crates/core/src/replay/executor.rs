//! Straight-line execution of replay units
//!
//! The executor walks the instruction list exactly once, in order. Missing
//! context keys, missing factories and malformed programs are startup
//! failures of the generated unit, reported on the replay error surface.

use crate::emit::{Operand, ReplayMethod, ReplayOp, ReplayUnit};
use crate::error::{ReplayError, ReplayResult};

use super::context::RuntimeContext;
use super::target::{FactoryRegistry, ReplayArg, ReplayTarget};

struct Slot {
    contract: String,
    target: Box<dyn ReplayTarget>,
}

/// Execute every method of a unit, in declared order
pub fn replay_unit(
    unit: &ReplayUnit,
    registry: &FactoryRegistry,
    ctx: &mut RuntimeContext,
) -> ReplayResult<()> {
    tracing::debug!("replaying unit {} ({} methods)", unit.name, unit.methods.len());
    for method in &unit.methods {
        replay_method(method, registry, ctx)?;
    }
    Ok(())
}

/// Execute one synthesized method body against the runtime context
pub fn replay_method(
    method: &ReplayMethod,
    registry: &FactoryRegistry,
    ctx: &mut RuntimeContext,
) -> ReplayResult<()> {
    let mut slots: Vec<Option<Slot>> = Vec::new();

    for op in &method.ops {
        match op {
            ReplayOp::Construct { slot, contract } => {
                if slots.len() <= *slot {
                    slots.resize_with(slot + 1, || None);
                }
                if slots[*slot].is_some() {
                    return Err(ReplayError::Malformed(format!(
                        "slot {slot} constructed twice"
                    )));
                }
                tracing::trace!("constructing {} into slot {}", contract, slot);
                slots[*slot] = Some(Slot {
                    contract: contract.clone(),
                    target: registry.construct(contract)?,
                });
            }
            ReplayOp::Invoke {
                slot,
                method,
                args,
                bind,
            } => {
                let resolved = resolve_args(args, ctx)?;
                let entry = slots
                    .get_mut(*slot)
                    .and_then(Option::as_mut)
                    .ok_or_else(|| {
                        ReplayError::Malformed(format!("invoke on unconstructed slot {slot}"))
                    })?;
                tracing::trace!("invoking {}.{}", entry.contract, method);
                let result = entry.target.invoke(method, &resolved, ctx)?;
                if let Some(key) = bind {
                    match result {
                        Some(value) => ctx.bind(key.clone(), value),
                        None => {
                            return Err(ReplayError::MissingResult {
                                contract: entry.contract.clone(),
                                method: method.clone(),
                                key: key.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn resolve_args(args: &[Operand], ctx: &RuntimeContext) -> ReplayResult<Vec<ReplayArg>> {
    let mut resolved = Vec::with_capacity(args.len());
    for operand in args {
        resolved.push(match operand {
            Operand::Literal(value) => ReplayArg::Value(value.clone()),
            Operand::ContextLookup(key) => ReplayArg::Value(
                ctx.lookup(key)
                    .cloned()
                    .ok_or_else(|| ReplayError::MissingKey { key: key.clone() })?,
            ),
            Operand::Context => ReplayArg::Context,
        });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test double that logs every invocation it receives
    struct Probe {
        log: Rc<RefCell<Vec<String>>>,
        level: i64,
    }

    impl ReplayTarget for Probe {
        fn invoke(
            &mut self,
            method: &str,
            args: &[ReplayArg],
            _ctx: &mut RuntimeContext,
        ) -> ReplayResult<Option<Value>> {
            let rendered: Vec<String> = args.iter().map(|a| format!("{a:?}")).collect();
            self.log
                .borrow_mut()
                .push(format!("{method}({})", rendered.join(", ")));
            match method {
                "configure" => Ok(None),
                "level" => Ok(Some(Value::Int(self.level))),
                other => Err(ReplayError::UnknownMethod {
                    contract: "Probe".to_string(),
                    method: other.to_string(),
                }),
            }
        }
    }

    fn probe_registry(log: &Rc<RefCell<Vec<String>>>) -> FactoryRegistry {
        let mut registry = FactoryRegistry::new();
        let log = Rc::clone(log);
        registry.register("Setup", move || {
            Box::new(Probe {
                log: Rc::clone(&log),
                level: 7,
            })
        });
        registry
    }

    fn invoke_op(slot: usize, method: &str, args: Vec<Operand>, bind: Option<&str>) -> ReplayOp {
        ReplayOp::Invoke {
            slot,
            method: method.to_string(),
            args,
            bind: bind.map(String::from),
        }
    }

    fn construct_op(slot: usize, contract: &str) -> ReplayOp {
        ReplayOp::Construct {
            slot,
            contract: contract.to_string(),
        }
    }

    fn method_of(ops: Vec<ReplayOp>) -> ReplayMethod {
        ReplayMethod {
            name: "startup".to_string(),
            ops,
        }
    }

    #[test]
    fn test_context_substitution() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let mut ctx = RuntimeContext::new().with("pool-size", 16);

        let method = method_of(vec![
            construct_op(0, "Setup"),
            invoke_op(
                0,
                "configure",
                vec![
                    Operand::Literal(Value::Str("shared-cache".to_string())),
                    Operand::ContextLookup("pool-size".to_string()),
                ],
                None,
            ),
        ]);
        replay_method(&method, &registry, &mut ctx).unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            ["configure(Value(Str(\"shared-cache\")), Value(Int(16)))"]
        );
    }

    #[test]
    fn test_replay_is_deterministic() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let method = method_of(vec![
            construct_op(0, "Setup"),
            invoke_op(
                0,
                "configure",
                vec![Operand::Literal(Value::Str("pool".to_string()))],
                None,
            ),
        ]);

        let mut ctx = RuntimeContext::new();
        replay_method(&method, &registry, &mut ctx).unwrap();
        let first = log.borrow().clone();
        log.borrow_mut().clear();

        let mut ctx = RuntimeContext::new();
        replay_method(&method, &registry, &mut ctx).unwrap();
        assert_eq!(*log.borrow(), first);
    }

    #[test]
    fn test_missing_key_is_replay_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let mut ctx = RuntimeContext::new();

        let method = method_of(vec![
            construct_op(0, "Setup"),
            invoke_op(
                0,
                "configure",
                vec![Operand::ContextLookup("pool-size".to_string())],
                None,
            ),
        ]);
        let err = replay_method(&method, &registry, &mut ctx).unwrap_err();
        assert!(matches!(err, ReplayError::MissingKey { key } if key == "pool-size"));
        // the invocation never reached the target
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_bound_result_stored_in_context() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let mut ctx = RuntimeContext::new();

        let method = method_of(vec![
            construct_op(0, "Setup"),
            invoke_op(0, "level", vec![], Some("gauge-level")),
        ]);
        replay_method(&method, &registry, &mut ctx).unwrap();
        assert_eq!(ctx.lookup("gauge-level"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_bound_result_missing_is_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let mut ctx = RuntimeContext::new();

        let method = method_of(vec![
            construct_op(0, "Setup"),
            invoke_op(0, "configure", vec![], Some("configured")),
        ]);
        let err = replay_method(&method, &registry, &mut ctx).unwrap_err();
        assert!(matches!(err, ReplayError::MissingResult { .. }));
    }

    #[test]
    fn test_malformed_programs_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = probe_registry(&log);
        let mut ctx = RuntimeContext::new();

        let unconstructed = method_of(vec![invoke_op(0, "configure", vec![], None)]);
        assert!(matches!(
            replay_method(&unconstructed, &registry, &mut ctx),
            Err(ReplayError::Malformed(_))
        ));

        let double = method_of(vec![construct_op(0, "Setup"), construct_op(0, "Setup")]);
        assert!(matches!(
            replay_method(&double, &registry, &mut ctx),
            Err(ReplayError::Malformed(_))
        ));
    }

    #[test]
    fn test_unregistered_contract_fails() {
        let registry = FactoryRegistry::new();
        let mut ctx = RuntimeContext::new();
        let method = method_of(vec![construct_op(0, "Ghost")]);
        let err = replay_method(&method, &registry, &mut ctx).unwrap_err();
        assert!(matches!(err, ReplayError::UnknownContract { .. }));
    }
}
