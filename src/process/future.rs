//! 挂起点
//!
//! 每个 future 第一次被 poll 时向时钟登记唤醒方式并返回 `Pending`；
//! 之后只有在时钟给出信号时才会完成。时钟用 no-op waker 驱动进程，
//! 这里不保存也不调用 waker。

use super::channel::Channel;
use super::kernel::{Kernel, Request, Signal};
use crate::sim::{Interrupted, ProcessId, SimTime};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

fn signal_to_result(signal: Signal) -> Result<(), Interrupted> {
    match signal {
        Signal::Resume => Ok(()),
        Signal::Interrupt => Err(Interrupted),
    }
}

/// `delay(Δt)`：挂起到 `now + Δt`
pub struct Delay {
    pub(crate) pid: ProcessId,
    pub(crate) kernel: Rc<Kernel>,
    pub(crate) delay: SimTime,
    pub(crate) armed: bool,
}

impl Future for Delay {
    type Output = Result<(), Interrupted>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if !this.armed {
            this.armed = true;
            let until = this.kernel.now().saturating_add(this.delay);
            this.kernel.request(Request::Delay {
                pid: this.pid,
                until,
            });
            return Poll::Pending;
        }
        match this.kernel.take_signal(this.pid) {
            Some(signal) => Poll::Ready(signal_to_result(signal)),
            None => Poll::Pending,
        }
    }
}

/// `wait(predicate)`：挂起到谓词成立。谓词一开始就成立时不挂起。
pub struct Wait {
    pub(crate) pid: ProcessId,
    pub(crate) kernel: Rc<Kernel>,
    pub(crate) predicate: Option<Box<dyn FnMut() -> bool>>,
}

impl Future for Wait {
    type Output = Result<(), Interrupted>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(mut predicate) = this.predicate.take() {
            if predicate() {
                return Poll::Ready(Ok(()));
            }
            this.kernel.request(Request::Wait {
                pid: this.pid,
                predicate,
            });
            return Poll::Pending;
        }
        match this.kernel.take_signal(this.pid) {
            Some(signal) => Poll::Ready(signal_to_result(signal)),
            None => Poll::Pending,
        }
    }
}

/// 从通道阻塞取出
pub struct Take<T> {
    pub(crate) pid: ProcessId,
    pub(crate) kernel: Rc<Kernel>,
    pub(crate) chan: Channel<T>,
    pub(crate) blocked: bool,
}

impl<T> Future for Take<T> {
    type Output = Result<T, Interrupted>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.blocked {
            match this.kernel.take_signal(this.pid) {
                None => return Poll::Pending,
                Some(Signal::Interrupt) => {
                    this.chan.abandon_take(this.pid);
                    return Poll::Ready(Err(Interrupted));
                }
                Some(Signal::Resume) => {
                    this.blocked = false;
                    if let Some(item) = this.chan.claim_handoff(this.pid) {
                        return Poll::Ready(Ok(item));
                    }
                }
            }
        }
        if let Some(item) = this.chan.try_take() {
            return Poll::Ready(Ok(item));
        }
        this.chan.add_taker(this.pid);
        this.kernel.request(Request::Block { pid: this.pid });
        this.blocked = true;
        Poll::Pending
    }
}

/// 向通道阻塞放入。
///
/// 被中断时，尚未被接收的元素随错误一起丢弃；若元素在中断前已被接收，
/// 它留在通道里，但 `put` 仍然返回 [`Interrupted`]。
pub struct Put<T> {
    pub(crate) pid: ProcessId,
    pub(crate) kernel: Rc<Kernel>,
    pub(crate) chan: Channel<T>,
    pub(crate) item: Option<T>,
    pub(crate) blocked: bool,
}

// 从不对 `item` 做 pin 投影。
impl<T> Unpin for Put<T> {}

impl<T> Future for Put<T> {
    type Output = Result<(), Interrupted>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.blocked {
            return match this.kernel.take_signal(this.pid) {
                None => Poll::Pending,
                Some(Signal::Interrupt) => {
                    this.chan.abandon_put(this.pid);
                    Poll::Ready(Err(Interrupted))
                }
                Some(Signal::Resume) if this.chan.claim_accepted(this.pid) => Poll::Ready(Ok(())),
                Some(Signal::Resume) => {
                    this.kernel.request(Request::Block { pid: this.pid });
                    Poll::Pending
                }
            };
        }
        let Some(item) = this.item.take() else {
            return Poll::Ready(Ok(()));
        };
        match this.chan.try_put(item) {
            Ok(()) => Poll::Ready(Ok(())),
            Err(item) => {
                this.chan.add_putter(this.pid, item);
                this.kernel.request(Request::Block { pid: this.pid });
                this.blocked = true;
                Poll::Pending
            }
        }
    }
}
