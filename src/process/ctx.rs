//! 进程句柄
//!
//! 传给进程体的唯一入口。进程从不直接接触事件队列，只通过这里请求唤醒。

use super::channel::Channel;
use super::future::{Delay, Put, Take, Wait};
use super::kernel::{Kernel, ProcessState, Request};
use crate::sim::{ProcessId, SimError, SimTime};
use std::rc::Rc;

#[derive(Clone)]
pub struct ProcessCtx {
    pid: ProcessId,
    kernel: Rc<Kernel>,
}

impl ProcessCtx {
    pub(crate) fn new(pid: ProcessId, kernel: Rc<Kernel>) -> Self {
        Self { pid, kernel }
    }

    pub fn id(&self) -> ProcessId {
        self.pid
    }

    pub fn now(&self) -> SimTime {
        self.kernel.now()
    }

    pub fn delay(&self, delay: SimTime) -> Delay {
        Delay {
            pid: self.pid,
            kernel: Rc::clone(&self.kernel),
            delay,
            armed: false,
        }
    }

    pub fn wait(&self, predicate: impl FnMut() -> bool + 'static) -> Wait {
        Wait {
            pid: self.pid,
            kernel: Rc::clone(&self.kernel),
            predicate: Some(Box::new(predicate)),
        }
    }

    pub fn take<T>(&self, chan: &Channel<T>) -> Take<T> {
        Take {
            pid: self.pid,
            kernel: Rc::clone(&self.kernel),
            chan: chan.clone(),
            blocked: false,
        }
    }

    pub fn put<T>(&self, chan: &Channel<T>, item: T) -> Put<T> {
        Put {
            pid: self.pid,
            kernel: Rc::clone(&self.kernel),
            chan: chan.clone(),
            item: Some(item),
            blocked: false,
        }
    }

    /// 中断另一个挂起中的进程。在当前动作返回后、运行循环再次读取队列之前生效。
    ///
    /// 返回 `Ok` 只表示请求已登记；若生效时目标已不再挂起，失败记为本进程的故障。
    pub fn interrupt(&self, target: ProcessId) -> Result<(), SimError> {
        match self.kernel.state(target) {
            None => Err(SimError::UnknownProcess(target)),
            Some(ProcessState::Suspended) => {
                self.kernel.request(Request::Interrupt {
                    pid: target,
                    from: self.pid,
                });
                Ok(())
            }
            Some(_) => Err(SimError::ProcessNotSuspended(target)),
        }
    }

    pub fn state_of(&self, pid: ProcessId) -> Option<ProcessState> {
        self.kernel.state(pid)
    }
}
