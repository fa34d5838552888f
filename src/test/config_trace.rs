use crate::sim::{
    Clock, ClockConfig, EntityId, EventId, IdleAdvance, ProcessId, SimTime, TimeUnit, TraceKind,
    TraceRecord,
};
use serde_json::json;

#[test]
fn clock_config_fills_missing_fields_with_defaults() {
    let cfg: ClockConfig = serde_json::from_str("{}").expect("parse empty config");
    assert_eq!(cfg, ClockConfig::default());

    let cfg: ClockConfig = serde_json::from_value(json!({
        "start_time": 50,
        "time_unit": "micros",
        "condition_tick": 5,
        "idle_advance": "jump_to_target",
        "trace": true
    }))
    .expect("parse full config");
    assert_eq!(cfg.start_time, SimTime(50));
    assert_eq!(cfg.time_unit, TimeUnit::Micros);
    assert_eq!(cfg.condition_tick, Some(SimTime(5)));
    assert_eq!(cfg.idle_advance, IdleAdvance::JumpToTarget);
    assert!(cfg.trace);
}

#[test]
fn trace_is_off_by_default() {
    let mut clock = Clock::default();
    clock.initialize().expect("initialize");
    clock.schedule_fn_at(SimTime(1), |_| Ok(())).expect("schedule");
    clock.run_until(SimTime(2)).expect("run");

    assert!(!clock.trace().is_enabled());
    assert!(clock.trace().records().is_empty());
}

#[test]
fn trace_records_lifecycle_of_entities() {
    let mut clock = Clock::new(ClockConfig {
        trace: true,
        ..ClockConfig::default()
    });
    clock.initialize().expect("initialize");
    let kept = clock.schedule_fn_at(SimTime(3), |_| Ok(())).expect("schedule");
    let dropped = clock.schedule_fn_at(SimTime(4), |_| Ok(())).expect("schedule");
    clock.cancel(dropped).expect("cancel");
    clock.run_until(SimTime(10)).expect("run");

    let kinds: Vec<(SimTime, EntityId, TraceKind)> = clock
        .take_trace()
        .into_iter()
        .map(|r| (r.t, r.entity, r.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (
                SimTime(0),
                EntityId::from(kept),
                TraceKind::Scheduled { due: SimTime(3) }
            ),
            (
                SimTime(0),
                EntityId::from(dropped),
                TraceKind::Scheduled { due: SimTime(4) }
            ),
            (SimTime(0), EntityId::from(dropped), TraceKind::Cancelled),
            (SimTime(3), EntityId::from(kept), TraceKind::Executed),
        ]
    );
    assert!(clock.trace().records().is_empty());
}

#[test]
fn trace_records_serialize_flat() {
    let record = TraceRecord {
        t: SimTime(7),
        entity: EntityId::Event(EventId(2)),
        kind: TraceKind::Scheduled { due: SimTime(9) },
    };
    assert_eq!(
        serde_json::to_value(&record).expect("serialize"),
        json!({ "t": 7, "entity": { "event": 2 }, "kind": "scheduled", "due": 9 })
    );

    let record = TraceRecord {
        t: SimTime(1),
        entity: ProcessId(0).into(),
        kind: TraceKind::ProcessResumed { interrupted: true },
    };
    let v = serde_json::to_value(&record).expect("serialize");
    assert_eq!(v["kind"], "process_resumed");
    assert_eq!(v["interrupted"], true);
    assert_eq!(v["entity"]["process"], 0);
}

#[test]
fn fault_is_traced_with_its_message() {
    let mut clock = Clock::default();
    clock.initialize().expect("initialize");
    clock.set_trace_enabled(true);
    let id = clock
        .schedule_fn_at(SimTime(1), |_| {
            Err(crate::sim::ActionFault::msg("disk full"))
        })
        .expect("schedule");
    clock.run_until(SimTime(1)).expect("run");

    let fault = clock
        .trace()
        .records()
        .iter()
        .find(|r| matches!(r.kind, TraceKind::Fault { .. }))
        .cloned()
        .expect("fault record");
    assert_eq!(fault.entity, EntityId::from(id));
    assert_eq!(
        fault.kind,
        TraceKind::Fault {
            message: "disk full".to_string()
        }
    );

    clock.clear_trace();
    assert!(clock.trace().records().is_empty());
    // 重置不清除记录开关
    clock.reset().expect("reset");
    assert!(clock.trace().is_enabled());
}
