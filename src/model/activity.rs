//! 定时活动
//!
//! 一个持续固定时长的活动：开始时登记完成事件，完成时执行回调。
//! 可以查询进度或在完成前取消。

use crate::sim::{ActionResult, Clock, EventId, SimError, SimTime};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Running,
    Finished,
    Cancelled,
}

/// 活动句柄
#[derive(Debug, Clone)]
pub struct Activity {
    name: String,
    started_at: SimTime,
    finishes_at: SimTime,
    completion: EventId,
    status: Rc<Cell<ActivityStatus>>,
}

impl Activity {
    /// 在当前时刻开始一个时长为 `duration` 的活动。
    pub fn start<F>(
        clock: &mut Clock,
        name: impl Into<String>,
        duration: SimTime,
        on_finish: F,
    ) -> Result<Activity, SimError>
    where
        F: FnOnce(&mut Clock) -> ActionResult + 'static,
    {
        let name = name.into();
        let status = Rc::new(Cell::new(ActivityStatus::Running));
        let started_at = clock.now();
        let finishes_at = started_at
            .checked_add(duration)
            .ok_or(SimError::TimeOverflow)?;

        let done = Rc::clone(&status);
        let label = name.clone();
        let completion = clock.schedule_fn_at(finishes_at, move |clock: &mut Clock| {
            done.set(ActivityStatus::Finished);
            debug!(activity = %label, now = ?clock.now(), "活动完成");
            on_finish(clock)
        })?;
        debug!(activity = %name, started_at = ?started_at, finishes_at = ?finishes_at, "活动开始");

        Ok(Activity {
            name,
            started_at,
            finishes_at,
            completion,
            status,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ActivityStatus {
        self.status.get()
    }

    pub fn started_at(&self) -> SimTime {
        self.started_at
    }

    pub fn finishes_at(&self) -> SimTime {
        self.finishes_at
    }

    pub fn remaining(&self, now: SimTime) -> SimTime {
        match self.status() {
            ActivityStatus::Running => self.finishes_at.saturating_sub(now),
            ActivityStatus::Finished | ActivityStatus::Cancelled => SimTime::ZERO,
        }
    }

    /// 完成比例，范围 `[0, 1]`。零时长活动视为已完成。
    pub fn progress(&self, now: SimTime) -> f64 {
        if self.status() == ActivityStatus::Finished {
            return 1.0;
        }
        let total = self.finishes_at.saturating_sub(self.started_at).ticks();
        if total == 0 {
            return 1.0;
        }
        let elapsed = now.min(self.finishes_at).saturating_sub(self.started_at).ticks();
        elapsed as f64 / total as f64
    }

    /// 在完成前取消；完成回调不会执行。
    pub fn cancel(&self, clock: &mut Clock) -> Result<(), SimError> {
        clock.cancel(self.completion)?;
        self.status.set(ActivityStatus::Cancelled);
        debug!(activity = %self.name, now = ?clock.now(), "活动取消");
        Ok(())
    }
}
