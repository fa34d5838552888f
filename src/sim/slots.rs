//! 按注册顺序排列的槽位表，条件表与采样表共用。
//!
//! 条目在执行期间被临时取出（槽位保留），执行完毕后再放回；
//! 若执行期间槽位被删除，放回操作静默丢弃该条目。

use std::collections::BTreeMap;

pub(crate) struct Slots<V> {
    next_id: u64,
    entries: BTreeMap<u64, Option<V>>,
}

impl<V> Default for Slots<V> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<V> Slots<V> {
    pub(crate) fn insert(&mut self, value: V) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(id, Some(value));
        id
    }

    pub(crate) fn take(&mut self, id: u64) -> Option<V> {
        self.entries.get_mut(&id)?.take()
    }

    pub(crate) fn restore(&mut self, id: u64, value: V) {
        if let Some(slot) = self.entries.get_mut(&id) {
            *slot = Some(value);
        }
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// 当前所有槽位 id（升序，即注册顺序）。
    pub(crate) fn ids(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = (u64, &V)> + '_ {
        self.entries
            .iter()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (*id, v)))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空槽位，id 不回收。
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
