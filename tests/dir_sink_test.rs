//! Integration test for writing synthesized units to a directory sink

use std::fs;
use std::sync::Arc;

use playback_core::{
    ArgValue, Contract, DirSink, MethodSig, NameAllocator, ParamSpec, Recorder, ReplayUnit,
    ServiceContract,
};
use tempfile::TempDir;

#[test]
fn test_units_land_on_disk_and_parse_back() {
    let temp_dir = TempDir::new().unwrap();
    let mut sink = DirSink::new(temp_dir.path().join("units"));

    let contract = Arc::new(
        Contract::builder("Setup")
            .with_method(
                MethodSig::new("configure")
                    .with_param(ParamSpec::str("name"))
                    .with_param(ParamSpec::int("size")),
            )
            .build()
            .unwrap(),
    );
    let service = ServiceContract::builder("StartupHook")
        .with_method("startup")
        .build()
        .unwrap();

    let mut names = NameAllocator::new("playback");

    // two independent sessions write two units into the same sink
    for step in ["datasource", "messaging"] {
        let recorder = Recorder::new(&mut names, step, service.clone());
        let proxy = recorder.recording_proxy(&contract).unwrap();
        proxy
            .call("configure", vec![ArgValue::from(step), ArgValue::from(4)])
            .unwrap();
        recorder.finish(&mut sink).unwrap();
    }

    let dir = temp_dir.path().join("units");
    let first = fs::read(dir.join("playback.datasource.0.json")).unwrap();
    let second = fs::read(dir.join("playback.messaging.1.json")).unwrap();

    let unit = ReplayUnit::from_slice(&first).unwrap();
    assert_eq!(unit.name, "playback.datasource.0");
    assert_eq!(unit.service, "StartupHook");

    let unit = ReplayUnit::from_slice(&second).unwrap();
    assert_eq!(unit.name, "playback.messaging.1");
}
