//! Walkthrough of the full pipeline: record, emit, inspect, replay.
//!
//! Run with `RUST_LOG=debug` to watch the session and the executor work.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use playback::{
    ArgValue, Contract, FactoryRegistry, MemorySink, MethodSig, NameAllocator, ParamSpec, Recorder,
    ReplayArg, ReplayTarget, ReplayUnit, ReturnSpec, RuntimeContext, ServiceContract, Value,
    replay_unit,
};

/// The real pool setup that exists only at startup
struct PoolSetup {
    log: Rc<RefCell<Vec<String>>>,
}

impl ReplayTarget for PoolSetup {
    fn invoke(
        &mut self,
        method: &str,
        args: &[ReplayArg],
        _ctx: &mut RuntimeContext,
    ) -> playback::ReplayResult<Option<Value>> {
        self.log.borrow_mut().push(format!("{method} {args:?}"));
        match method {
            "configure" => Ok(None),
            "with_size" => Ok(None),
            "start" => Ok(None),
            "size" => Ok(Some(Value::Int(args.first().and_then(|a| a.as_int()).unwrap_or(0)))),
            other => Err(playback::ReplayError::UnknownMethod {
                contract: "PoolSetup".to_string(),
                method: other.to_string(),
            }),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // the contract a build step programs against
    let pool = Arc::new(
        Contract::builder("PoolSetup")
            .with_method(
                MethodSig::new("configure")
                    .with_param(ParamSpec::str("name"))
                    .with_param(ParamSpec::int("size")),
            )
            .with_method(
                MethodSig::new("with_size")
                    .with_param(ParamSpec::int("size"))
                    .with_return(ReturnSpec::chained("PoolSetup")),
            )
            .with_method(MethodSig::new("start"))
            .build()?,
    );
    let service = ServiceContract::builder("StartupHook")
        .with_method("startup")
        .build()?;

    // build phase: the "calls" below execute nothing, they only record
    let mut names = NameAllocator::new("playback");
    let recorder = Recorder::new(&mut names, "showcase", service);
    let proxy = recorder.recording_proxy(&pool)?;
    proxy.call("configure", vec![ArgValue::from("primary"), ArgValue::from(4)])?;
    let chained = proxy
        .call("with_size", vec![ArgValue::from(8)])?
        .chained()
        .expect("PoolSetup chains to itself");
    chained.call("start", vec![])?;

    let mut sink = MemorySink::new();
    let unit_name = recorder.unit_name();
    recorder.finish(&mut sink)?;

    // what the packaging stage persisted
    let bytes = sink.find(&unit_name).expect("unit written");
    let unit = ReplayUnit::from_slice(bytes)?;
    println!("{}", unit.render_source());

    // startup phase: replay against real objects
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FactoryRegistry::new();
    {
        let log = Rc::clone(&log);
        registry.register("PoolSetup", move || {
            Box::new(PoolSetup {
                log: Rc::clone(&log),
            })
        });
    }
    let mut ctx = RuntimeContext::new();
    replay_unit(&unit, &registry, &mut ctx)?;

    println!("replayed invocations:");
    for line in log.borrow().iter() {
        println!("  {line}");
    }
    Ok(())
}
