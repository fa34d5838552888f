//! 事件队列
//!
//! 按 `(due, seq)` 排序的最小堆。取消采用惰性删除：被取消的条目留在堆里，
//! 但堆顶始终是一个仍然有效的条目。

use super::event::Event;
use super::id::EventId;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use std::collections::{BinaryHeap, HashSet};

#[derive(Default)]
pub struct EventQueue {
    next_seq: u64,
    heap: BinaryHeap<ScheduledEvent>,
    live: HashSet<u64>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个事件，分配新的序列号。
    pub fn push(&mut self, at: SimTime, ev: Box<dyn Event>) -> EventId {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.live.insert(seq);
        self.heap.push(ScheduledEvent { at, seq, ev });
        EventId(seq)
    }

    /// 剩余条目中最小的 `due`。
    pub fn peek_next_due(&self) -> Option<SimTime> {
        self.heap.peek().map(|top| top.at)
    }

    /// 若堆顶 `due <= limit` 则弹出。
    pub fn pop_next_due(&mut self, limit: SimTime) -> Option<ScheduledEvent> {
        if self.peek_next_due()? > limit {
            return None;
        }
        let item = self.heap.pop()?;
        self.live.remove(&item.seq);
        self.discard_cancelled();
        Some(item)
    }

    /// 按 `(due, seq)` 顺序弹出所有 `due <= limit` 的条目。
    pub fn pop_due(&mut self, limit: SimTime) -> Vec<ScheduledEvent> {
        let mut out = Vec::new();
        while let Some(item) = self.pop_next_due(limit) {
            out.push(item);
        }
        out
    }

    /// 按标识取消一个尚未执行的条目；条目不存在时返回 false。
    pub fn cancel(&mut self, id: EventId) -> bool {
        if !self.live.remove(&id.0) {
            return false;
        }
        self.discard_cancelled();
        true
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.live.contains(&id.0)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// 清空所有条目。序列号继续递增，清空前发出的 [`EventId`] 不会指向新条目。
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                break;
            }
            self.heap.pop();
        }
    }
}
