//! 采样表
//!
//! 以固定周期重复执行的动作，独立于事件队列。每次触发后在 `now + period`
//! 重新挂起。

use super::clock::Clock;
use super::error::ActionResult;
use super::id::SamplerId;
use super::slots::Slots;
use super::time::SimTime;

pub type SampleFn = Box<dyn FnMut(&mut Clock) -> ActionResult>;

pub(crate) struct SamplingEntry {
    pub(crate) period: SimTime,
    pub(crate) next_at: SimTime,
    pub(crate) action: SampleFn,
}

#[derive(Default)]
pub(crate) struct SamplingRegistry {
    slots: Slots<SamplingEntry>,
}

impl SamplingRegistry {
    pub(crate) fn insert(&mut self, period: SimTime, first_at: SimTime, action: SampleFn) -> SamplerId {
        SamplerId(self.slots.insert(SamplingEntry {
            period,
            next_at: first_at,
            action,
        }))
    }

    pub(crate) fn take(&mut self, id: SamplerId) -> Option<SamplingEntry> {
        self.slots.take(id.0)
    }

    pub(crate) fn restore(&mut self, id: SamplerId, entry: SamplingEntry) {
        self.slots.restore(id.0, entry);
    }

    /// 最早的下一次触发时间。
    pub(crate) fn next_fire(&self) -> Option<SimTime> {
        self.slots.values().map(|(_, e)| e.next_at).min()
    }

    /// `next_at <= now` 的采样器，按注册顺序。
    pub(crate) fn due(&self, now: SimTime) -> Vec<SamplerId> {
        self.slots
            .values()
            .filter(|(_, e)| e.next_at <= now)
            .map(|(id, _)| SamplerId(id))
            .collect()
    }

    pub(crate) fn remove(&mut self, id: SamplerId) -> bool {
        self.slots.remove(id.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
