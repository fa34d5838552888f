//! 虚拟时间感知的阻塞队列
//!
//! 进程通过 [`ProcessCtx::take`](super::ProcessCtx::take) /
//! [`ProcessCtx::put`](super::ProcessCtx::put) 阻塞式收发；任何代码都可以用
//! `try_take`/`try_put` 非阻塞访问。被阻塞的进程只会经由事件队列在当前时刻被唤醒，
//! 因此数据流动完全由仿真时间决定。
//!
//! 等待者按 FIFO 服务：有进程在等 take 时，新放入的元素直接交给最早的等待者；
//! 有进程在等 put 时，取走一个元素会让最早等待的 put 完成。

use super::kernel::{Kernel, Request};
use crate::sim::ProcessId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

struct ChannelInner<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
    takers: VecDeque<ProcessId>,
    /// 已交给被唤醒、但尚未恢复的 taker 的元素
    handoff: HashMap<ProcessId, T>,
    putters: VecDeque<(ProcessId, T)>,
    /// 元素已被接收、但尚未恢复的 putter
    accepted: HashSet<ProcessId>,
}

impl<T> ChannelInner<T> {
    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.items.len() >= cap)
    }
}

/// FIFO 通道。克隆得到的是同一个通道的另一个句柄。
pub struct Channel<T> {
    inner: Rc<RefCell<ChannelInner<T>>>,
    kernel: Rc<Kernel>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            kernel: Rc::clone(&self.kernel),
        }
    }
}

impl<T> Channel<T> {
    pub(crate) fn new(kernel: Rc<Kernel>, capacity: Option<usize>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                items: VecDeque::new(),
                capacity,
                takers: VecDeque::new(),
                handoff: HashMap::new(),
                putters: VecDeque::new(),
                accepted: HashSet::new(),
            })),
            kernel,
        }
    }

    fn wake(&self, pid: ProcessId) {
        self.kernel.request(Request::Wake { pid });
    }

    /// 放入一个元素；满时原样退回。
    pub fn try_put(&self, item: T) -> Result<(), T> {
        let mut inner = self.inner.borrow_mut();
        if let Some(pid) = inner.takers.pop_front() {
            inner.handoff.insert(pid, item);
            self.wake(pid);
            return Ok(());
        }
        if inner.is_full() {
            return Err(item);
        }
        inner.items.push_back(item);
        Ok(())
    }

    pub fn try_take(&self) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        if let Some(item) = inner.items.pop_front() {
            if let Some((pid, pending)) = inner.putters.pop_front() {
                inner.items.push_back(pending);
                inner.accepted.insert(pid);
                self.wake(pid);
            }
            return Some(item);
        }
        // 零容量通道：直接从等待的 putter 手里拿
        let (pid, item) = inner.putters.pop_front()?;
        inner.accepted.insert(pid);
        self.wake(pid);
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.borrow().capacity
    }

    /// 当前阻塞在 take 上的进程数
    pub fn waiting_takers(&self) -> usize {
        self.inner.borrow().takers.len()
    }

    pub fn waiting_putters(&self) -> usize {
        self.inner.borrow().putters.len()
    }

    /// 登记等待 take 的进程；同一进程只排一次队。
    pub(crate) fn add_taker(&self, pid: ProcessId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.takers.contains(&pid) {
            inner.takers.push_back(pid);
        }
    }

    pub(crate) fn claim_handoff(&self, pid: ProcessId) -> Option<T> {
        self.inner.borrow_mut().handoff.remove(&pid)
    }

    /// taker 被中断：撤销等待；若已有元素交给它，转交下一个 taker 或放回队首。
    pub(crate) fn abandon_take(&self, pid: ProcessId) {
        let mut inner = self.inner.borrow_mut();
        inner.takers.retain(|p| *p != pid);
        let Some(item) = inner.handoff.remove(&pid) else {
            return;
        };
        if let Some(next) = inner.takers.pop_front() {
            inner.handoff.insert(next, item);
            self.wake(next);
        } else {
            inner.items.push_front(item);
        }
    }

    /// 登记等待 put 的进程。一个进程同一时刻只能有一个未完成的 put，
    /// 已有的旧条目被新条目取代。
    pub(crate) fn add_putter(&self, pid: ProcessId, item: T) {
        let mut inner = self.inner.borrow_mut();
        inner.putters.retain(|(p, _)| *p != pid);
        inner.putters.push_back((pid, item));
    }

    pub(crate) fn claim_accepted(&self, pid: ProcessId) -> bool {
        self.inner.borrow_mut().accepted.remove(&pid)
    }

    /// putter 被中断：尚未被接收的元素随之丢弃。
    pub(crate) fn abandon_put(&self, pid: ProcessId) {
        let mut inner = self.inner.borrow_mut();
        inner.putters.retain(|(p, _)| *p != pid);
        inner.accepted.remove(&pid);
    }
}
