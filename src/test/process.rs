use crate::process::{ProcessCtx, ProcessState};
use crate::sim::{
    ActionFault, ActionResult, Clock, ClockConfig, EntityId, Interrupted, ProcessId, SimError,
    SimTime,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<(&'static str, SimTime)>>>;

fn idle_clock() -> Clock {
    let mut clock = Clock::default();
    clock.initialize().expect("initialize");
    clock
}

async fn sleeper(ctx: ProcessCtx, pause: SimTime, log: Log) -> ActionResult {
    log.borrow_mut().push(("start", ctx.now()));
    match ctx.delay(pause).await {
        Ok(()) => log.borrow_mut().push(("woke", ctx.now())),
        Err(Interrupted) => log.borrow_mut().push(("interrupted", ctx.now())),
    }
    Ok(())
}

#[test]
fn delay_resumes_at_now_plus_delta() {
    let mut clock = idle_clock();
    let log = Log::default();
    let pid = {
        let log = Rc::clone(&log);
        clock
            .spawn_process("sleeper", move |ctx| sleeper(ctx, SimTime(5), log))
            .expect("spawn")
    };
    assert_eq!(clock.process_state(pid), Some(ProcessState::Created));
    assert_eq!(clock.process_name(pid), Some("sleeper"));
    assert!(log.borrow().is_empty(), "body must not run before start");

    assert_eq!(clock.start_processes().expect("start"), 1);
    assert_eq!(clock.start_processes().expect("start"), 0);
    assert_eq!(clock.process_state(pid), Some(ProcessState::Scheduled));

    let report = clock.run_until(SimTime(10)).expect("run");

    assert_eq!(
        &*log.borrow(),
        &[("start", SimTime(0)), ("woke", SimTime(5))]
    );
    assert_eq!(report.events_executed, 2);
    assert_eq!(clock.now(), SimTime(5));
    assert_eq!(clock.process_state(pid), Some(ProcessState::Finished));
}

#[test]
fn processes_start_in_creation_order() {
    let mut clock = idle_clock();
    let log = Log::default();
    for (name, pause) in [("p0", 3), ("p1", 1), ("p2", 3)] {
        let log = Rc::clone(&log);
        clock
            .spawn_process(name, move |ctx| async move {
                log.borrow_mut().push((name, ctx.now()));
                let _ = ctx.delay(SimTime(pause)).await;
                log.borrow_mut().push((name, ctx.now()));
                Ok(())
            })
            .expect("spawn");
    }
    clock.start_processes().expect("start");
    clock.run_until(SimTime(10)).expect("run");

    assert_eq!(
        &*log.borrow(),
        &[
            ("p0", SimTime(0)),
            ("p1", SimTime(0)),
            ("p2", SimTime(0)),
            ("p1", SimTime(1)),
            ("p0", SimTime(3)),
            ("p2", SimTime(3)),
        ]
    );
}

#[test]
fn wait_resumes_when_predicate_becomes_true() {
    let mut clock = idle_clock();
    let flag = Rc::new(Cell::new(false));
    let woke_at = Rc::new(Cell::new(None));
    {
        let (flag, woke_at) = (Rc::clone(&flag), Rc::clone(&woke_at));
        clock
            .spawn_process("waiter", move |ctx| async move {
                let watched = Rc::clone(&flag);
                if ctx.wait(move || watched.get()).await.is_ok() {
                    woke_at.set(Some(ctx.now()));
                }
                Ok(())
            })
            .expect("spawn");
    }
    {
        let flag = Rc::clone(&flag);
        clock
            .schedule_fn_at(SimTime(4), move |_| {
                flag.set(true);
                Ok(())
            })
            .expect("schedule");
    }
    clock.start_processes().expect("start");

    clock.run_until(SimTime(2)).expect("run");
    assert_eq!(woke_at.get(), None);
    assert_eq!(clock.pending_conditions(), 1);

    clock.run_until(SimTime(10)).expect("run");
    assert_eq!(woke_at.get(), Some(SimTime(4)));
    assert_eq!(clock.pending_conditions(), 0);
}

#[test]
fn wait_on_true_predicate_does_not_suspend() {
    let mut clock = idle_clock();
    let steps = Rc::new(Cell::new(0u32));
    let pid = {
        let steps = Rc::clone(&steps);
        clock
            .spawn_process("eager", move |ctx| async move {
                let _ = ctx.wait(|| true).await;
                steps.set(steps.get() + 1);
                Ok(())
            })
            .expect("spawn")
    };
    clock.start_processes().expect("start");
    let report = clock.run_until(SimTime(1)).expect("run");

    assert_eq!(steps.get(), 1);
    assert_eq!(report.events_executed, 1);
    assert_eq!(report.conditions_fired, 0);
    assert_eq!(clock.process_state(pid), Some(ProcessState::Finished));
}

#[test]
fn interrupt_cancels_wakeup_and_resumes_early() {
    let mut clock = idle_clock();
    let log = Log::default();
    let pid = {
        let log = Rc::clone(&log);
        clock
            .spawn_process("sleeper", move |ctx| sleeper(ctx, SimTime(5), log))
            .expect("spawn")
    };
    clock.start_processes().expect("start");

    let queue_delta = Rc::new(Cell::new(None));
    {
        let queue_delta = Rc::clone(&queue_delta);
        clock
            .schedule_fn_at(SimTime(2), move |clock| {
                let before = clock.pending_events();
                clock.interrupt(pid)?;
                queue_delta.set(Some(before - clock.pending_events()));
                Ok(())
            })
            .expect("schedule");
    }

    let report = clock.run_until(SimTime(10)).expect("run");

    assert_eq!(queue_delta.get(), Some(1));
    assert_eq!(
        &*log.borrow(),
        &[("start", SimTime(0)), ("interrupted", SimTime(2))]
    );
    // 启动事件 + 中断事件；t=5 的唤醒已被取消
    assert_eq!(report.events_executed, 2);
    assert_eq!(clock.now(), SimTime(2));
    assert_eq!(clock.process_state(pid), Some(ProcessState::Finished));
}

#[test]
fn interrupt_cancels_pending_wait_condition() {
    let mut clock = idle_clock();
    let outcome = Rc::new(Cell::new(None));
    let pid = {
        let outcome = Rc::clone(&outcome);
        clock
            .spawn_process("waiter", move |ctx| async move {
                outcome.set(Some(ctx.wait(|| false).await));
                Ok(())
            })
            .expect("spawn")
    };
    clock.start_processes().expect("start");
    clock.run_until(SimTime(1)).expect("run");
    assert_eq!(clock.pending_conditions(), 1);
    assert_eq!(clock.process_state(pid), Some(ProcessState::Suspended));

    clock.interrupt(pid).expect("interrupt");

    assert_eq!(outcome.get(), Some(Err(Interrupted)));
    assert_eq!(clock.pending_conditions(), 0);
    assert_eq!(clock.process_state(pid), Some(ProcessState::Finished));
}

#[test]
fn interrupt_requires_a_suspended_process() {
    let mut clock = idle_clock();
    let log = Log::default();
    let pid = clock
        .spawn_process("sleeper", move |ctx| sleeper(ctx, SimTime(1), log))
        .expect("spawn");

    assert_eq!(
        clock.interrupt(pid).unwrap_err(),
        SimError::ProcessNotSuspended(pid)
    );
    assert_eq!(
        clock.interrupt(ProcessId(99)).unwrap_err(),
        SimError::UnknownProcess(ProcessId(99))
    );

    clock.start_processes().expect("start");
    clock.run_until(SimTime(5)).expect("run");
    assert_eq!(
        clock.interrupt(pid).unwrap_err(),
        SimError::ProcessNotSuspended(pid)
    );
}

#[test]
fn process_can_interrupt_another_process() {
    let mut clock = idle_clock();
    let log = Log::default();
    let target = {
        let log = Rc::clone(&log);
        clock
            .spawn_process("target", move |ctx| sleeper(ctx, SimTime(10), log))
            .expect("spawn")
    };
    let seen_state = Rc::new(Cell::new(None));
    let interrupt_result = Rc::new(RefCell::new(None));
    {
        let (seen_state, interrupt_result) = (Rc::clone(&seen_state), Rc::clone(&interrupt_result));
        clock
            .spawn_process("interrupter", move |ctx| async move {
                let _ = ctx.delay(SimTime(2)).await;
                seen_state.set(ctx.state_of(target));
                *interrupt_result.borrow_mut() = Some(ctx.interrupt(target));
                Ok(())
            })
            .expect("spawn");
    }
    clock.start_processes().expect("start");
    clock.run_until(SimTime(20)).expect("run");

    assert_eq!(seen_state.get(), Some(ProcessState::Suspended));
    assert_eq!(*interrupt_result.borrow(), Some(Ok(())));
    assert_eq!(
        &*log.borrow(),
        &[("start", SimTime(0)), ("interrupted", SimTime(2))]
    );
    assert_eq!(clock.process_state(target), Some(ProcessState::Finished));
    assert_eq!(clock.now(), SimTime(2));
}

async fn flaky(ctx: ProcessCtx) -> ActionResult {
    ctx.delay(SimTime(1)).await?;
    Err(ActionFault::msg("worker crashed"))
}

#[test]
fn process_failure_terminates_only_that_process() {
    let mut clock = idle_clock();
    let log = Log::default();
    let bad = clock.spawn_process("flaky", flaky).expect("spawn");
    let good = {
        let log = Rc::clone(&log);
        clock
            .spawn_process("steady", move |ctx| sleeper(ctx, SimTime(3), log))
            .expect("spawn")
    };
    clock.start_processes().expect("start");

    clock.run_until(SimTime(10)).expect("run");

    assert_eq!(clock.process_state(bad), Some(ProcessState::Failed));
    assert_eq!(clock.process_state(good), Some(ProcessState::Finished));
    assert_eq!(
        &*log.borrow(),
        &[("start", SimTime(0)), ("woke", SimTime(3))]
    );
    let faults = clock.faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].source, EntityId::Process(bad));
    assert_eq!(faults[0].at, SimTime(1));
    assert_eq!(faults[0].fault, ActionFault::msg("worker crashed"));
}

#[test]
fn spawn_requires_initialized_clock() {
    let mut clock = Clock::new(ClockConfig::default());
    let err = clock
        .spawn_process("early", |_ctx| async { Ok(()) })
        .err()
        .expect("spawn must fail");
    assert_eq!(err, SimError::NotInitialized { op: "spawn_process" });
}

#[test]
fn reset_drops_processes() {
    let mut clock = idle_clock();
    let log = Log::default();
    let pid = clock
        .spawn_process("sleeper", move |ctx| sleeper(ctx, SimTime(5), log))
        .expect("spawn");
    clock.start_processes().expect("start");
    clock.run_until(SimTime(1)).expect("run");

    clock.reset().expect("reset");
    clock.initialize().expect("initialize");
    assert_eq!(clock.process_state(pid), None);
    assert_eq!(clock.pending_events(), 0);
    assert_eq!(
        clock.interrupt(pid).unwrap_err(),
        SimError::UnknownProcess(pid)
    );
}

#[test]
fn failed_interrupt_request_is_recorded_against_caller() {
    let mut clock = idle_clock();
    let log = Log::default();
    let target = {
        let log = Rc::clone(&log);
        clock
            .spawn_process("target", move |ctx| sleeper(ctx, SimTime(10), log))
            .expect("spawn")
    };
    let accepted = Rc::new(RefCell::new(Vec::new()));
    let caller = {
        let accepted = Rc::clone(&accepted);
        clock
            .spawn_process("caller", move |ctx| async move {
                let _ = ctx.delay(SimTime(2)).await;
                // 两次请求登记时目标都还挂起；第一次生效后目标已结束
                accepted.borrow_mut().push(ctx.interrupt(target));
                accepted.borrow_mut().push(ctx.interrupt(target));
                Ok(())
            })
            .expect("spawn")
    };
    clock.start_processes().expect("start");
    clock.run_until(SimTime(20)).expect("run");

    assert_eq!(&*accepted.borrow(), &[Ok(()), Ok(())]);
    assert_eq!(
        &*log.borrow(),
        &[("start", SimTime(0)), ("interrupted", SimTime(2))]
    );
    let faults = clock.faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].source, EntityId::Process(caller));
    assert_eq!(faults[0].at, SimTime(2));
    assert_eq!(
        faults[0].fault,
        ActionFault::Sim(SimError::ProcessNotSuspended(target))
    );
    assert_eq!(clock.process_state(caller), Some(ProcessState::Finished));
}
