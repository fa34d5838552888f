//! 条件事件表
//!
//! `(predicate, action)` 对：每当时钟在某个时刻推进后都会被反复扫描，
//! 直到一整轮扫描中没有任何条件触发（不动点）。

use super::event::Event;
use super::id::ConditionId;
use super::slots::Slots;

pub type Predicate = Box<dyn FnMut() -> bool>;

pub(crate) struct ConditionalEntry {
    pub(crate) predicate: Predicate,
    pub(crate) action: Box<dyn Event>,
}

#[derive(Default)]
pub(crate) struct ConditionalRegistry {
    slots: Slots<ConditionalEntry>,
}

impl ConditionalRegistry {
    pub(crate) fn insert(&mut self, predicate: Predicate, action: Box<dyn Event>) -> ConditionId {
        ConditionId(self.slots.insert(ConditionalEntry { predicate, action }))
    }

    pub(crate) fn take(&mut self, id: ConditionId) -> Option<ConditionalEntry> {
        self.slots.take(id.0)
    }

    pub(crate) fn restore(&mut self, id: ConditionId, entry: ConditionalEntry) {
        self.slots.restore(id.0, entry);
    }

    /// 扫描顺序：注册顺序。
    pub(crate) fn ids(&self) -> Vec<ConditionId> {
        self.slots.ids().into_iter().map(ConditionId).collect()
    }

    pub(crate) fn remove(&mut self, id: ConditionId) -> bool {
        self.slots.remove(id.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
