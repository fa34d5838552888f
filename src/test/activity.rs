use crate::model::{Activity, ActivityStatus};
use crate::sim::{Clock, SimError, SimTime};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn idle_clock() -> Clock {
    let mut clock = Clock::default();
    clock.initialize().expect("initialize");
    clock
}

#[test]
fn activity_finishes_after_its_duration() {
    let mut clock = idle_clock();
    let finished_at = Rc::new(Cell::new(None));
    let out = Rc::clone(&finished_at);
    let job = Activity::start(&mut clock, "job", SimTime(10), move |clock| {
        out.set(Some(clock.now()));
        Ok(())
    })
    .expect("start");

    assert_eq!(job.name(), "job");
    assert_eq!(job.status(), ActivityStatus::Running);
    assert_eq!(job.started_at(), SimTime(0));
    assert_eq!(job.finishes_at(), SimTime(10));
    assert_eq!(job.remaining(SimTime(4)), SimTime(6));
    assert!((job.progress(SimTime(5)) - 0.5).abs() < 1e-9);

    clock.run_until(SimTime(20)).expect("run");

    assert_eq!(finished_at.get(), Some(SimTime(10)));
    assert_eq!(job.status(), ActivityStatus::Finished);
    assert_eq!(job.remaining(clock.now()), SimTime::ZERO);
    assert_eq!(job.progress(clock.now()), 1.0);
}

#[test]
fn cancelled_activity_never_runs_its_callback() {
    let mut clock = idle_clock();
    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&calls);
    let job = Activity::start(&mut clock, "job", SimTime(10), move |_| {
        seen.set(seen.get() + 1);
        Ok(())
    })
    .expect("start");

    let handle = job.clone();
    clock
        .schedule_fn_at(SimTime(3), move |clock| {
            handle.cancel(clock)?;
            Ok(())
        })
        .expect("schedule");

    clock.run_until(SimTime(20)).expect("run");

    assert_eq!(calls.get(), 0);
    assert_eq!(job.status(), ActivityStatus::Cancelled);
    assert_eq!(clock.now(), SimTime(3));
    assert!(matches!(job.cancel(&mut clock), Err(SimError::NotPending(_))));
}

#[test]
fn activities_chain_through_callbacks() {
    let mut clock = idle_clock();
    let log = Rc::new(RefCell::new(Vec::new()));
    let out = Rc::clone(&log);
    Activity::start(&mut clock, "stage1", SimTime(2), move |clock| {
        out.borrow_mut().push(("stage1", clock.now()));
        let out = Rc::clone(&out);
        Activity::start(clock, "stage2", SimTime(3), move |clock| {
            out.borrow_mut().push(("stage2", clock.now()));
            Ok(())
        })?;
        Ok(())
    })
    .expect("start");

    clock.run_until(SimTime(10)).expect("run");

    assert_eq!(
        &*log.borrow(),
        &[("stage1", SimTime(2)), ("stage2", SimTime(5))]
    );
}

#[test]
fn zero_length_activity_counts_as_complete() {
    let mut clock = idle_clock();
    let job = Activity::start(&mut clock, "instant", SimTime::ZERO, |_| Ok(())).expect("start");
    assert_eq!(job.progress(SimTime::ZERO), 1.0);
}

#[test]
fn start_requires_initialized_clock() {
    let mut clock = Clock::default();
    let err = Activity::start(&mut clock, "early", SimTime(1), |_| Ok(())).unwrap_err();
    assert_eq!(err, SimError::NotInitialized { op: "schedule" });
}
