//! Context bindings: defer an argument to a startup-supplied value.
//!
//! The build step records a placeholder; the real value is looked up from
//! the runtime context when the unit replays, and a bound return slot stores
//! a call result back into the context for later units.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use playback::{
    ArgValue, Contract, FactoryRegistry, MemorySink, MethodSig, NameAllocator, ParamSpec, Recorder,
    ReplayArg, ReplayTarget, ReturnSpec, ReturnType, RuntimeContext, ServiceContract, Value,
    replay_unit,
};

struct CachePool {
    log: Rc<RefCell<Vec<String>>>,
    size: i64,
}

impl ReplayTarget for CachePool {
    fn invoke(
        &mut self,
        method: &str,
        args: &[ReplayArg],
        _ctx: &mut RuntimeContext,
    ) -> playback::ReplayResult<Option<Value>> {
        self.log.borrow_mut().push(format!("{method} {args:?}"));
        match method {
            "configure" => {
                self.size = args[1].as_int().unwrap_or(0);
                Ok(None)
            }
            "size" => Ok(Some(Value::Int(self.size))),
            other => Err(playback::ReplayError::UnknownMethod {
                contract: "CachePool".to_string(),
                method: other.to_string(),
            }),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let pool = Arc::new(
        Contract::builder("CachePool")
            .with_method(
                MethodSig::new("configure")
                    .with_param(ParamSpec::str("mode"))
                    // the size is not known at build time
                    .with_param(ParamSpec::int("size").bound("pool-size")),
            )
            .with_method(
                MethodSig::new("size")
                    .with_return(ReturnSpec::of(ReturnType::Int).bound("effective-size")),
            )
            .build()?,
    );
    let service = ServiceContract::builder("StartupHook")
        .with_method("startup")
        .build()?;

    let mut names = NameAllocator::new("playback");
    let recorder = Recorder::new(&mut names, "context_binding", service);
    let proxy = recorder.recording_proxy(&pool)?;
    proxy.call(
        "configure",
        vec![ArgValue::from("shared-cache"), ArgValue::null()],
    )?;
    proxy.call("size", vec![])?;

    let mut sink = MemorySink::new();
    let unit = recorder.finish(&mut sink)?;
    println!("{}", unit.render_source());

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FactoryRegistry::new();
    {
        let log = Rc::clone(&log);
        registry.register("CachePool", move || {
            Box::new(CachePool {
                log: Rc::clone(&log),
                size: 0,
            })
        });
    }

    // startup supplies the deferred value
    let mut ctx = RuntimeContext::new().with("pool-size", 16);
    replay_unit(&unit, &registry, &mut ctx)?;

    println!("effective-size in context: {:?}", ctx.lookup("effective-size"));
    for line in log.borrow().iter() {
        println!("  {line}");
    }
    Ok(())
}
