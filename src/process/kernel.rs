//! 时钟与进程之间的共享信箱
//!
//! 进程体运行时拿不到 `&mut Clock`，只能通过这里向时钟提出请求；
//! 时钟在每次动作执行完后统一处理这些请求。

use crate::sim::{ProcessId, SimTime};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// 进程生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// 已 spawn，尚未 `start_processes`
    Created,
    /// 启动事件已在队列中
    Scheduled,
    Running,
    Suspended,
    Finished,
    Failed,
}

/// 时钟恢复进程时传入的信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    Resume,
    Interrupt,
}

pub(crate) enum Request {
    /// 在 `until` 时刻唤醒
    Delay { pid: ProcessId, until: SimTime },
    /// 谓词成立时唤醒
    Wait {
        pid: ProcessId,
        predicate: Box<dyn FnMut() -> bool>,
    },
    /// 阻塞在通道上，由通道负责发出 `Wake`
    Block { pid: ProcessId },
    /// 通道操作已可完成，在当前时刻唤醒被阻塞的进程
    Wake { pid: ProcessId },
    /// `from` 请求中断 `pid`；失败时记为 `from` 的故障
    Interrupt { pid: ProcessId, from: ProcessId },
}

#[derive(Default)]
struct KernelState {
    requests: VecDeque<Request>,
    signals: HashMap<ProcessId, Signal>,
    states: BTreeMap<ProcessId, ProcessState>,
}

#[derive(Default)]
pub(crate) struct Kernel {
    now: Cell<SimTime>,
    inner: RefCell<KernelState>,
}

impl Kernel {
    pub(crate) fn now(&self) -> SimTime {
        self.now.get()
    }

    pub(crate) fn set_now(&self, now: SimTime) {
        self.now.set(now);
    }

    pub(crate) fn request(&self, req: Request) {
        self.inner.borrow_mut().requests.push_back(req);
    }

    pub(crate) fn pop_request(&self) -> Option<Request> {
        self.inner.borrow_mut().requests.pop_front()
    }

    pub(crate) fn set_signal(&self, pid: ProcessId, signal: Signal) {
        self.inner.borrow_mut().signals.insert(pid, signal);
    }

    pub(crate) fn take_signal(&self, pid: ProcessId) -> Option<Signal> {
        self.inner.borrow_mut().signals.remove(&pid)
    }

    pub(crate) fn state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.inner.borrow().states.get(&pid).copied()
    }

    pub(crate) fn set_state(&self, pid: ProcessId, state: ProcessState) {
        self.inner.borrow_mut().states.insert(pid, state);
    }

    pub(crate) fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.requests.clear();
        inner.signals.clear();
        inner.states.clear();
    }
}
