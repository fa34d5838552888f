//! 进程式建模
//!
//! 进程是一个 `async` 块：顺序书写的代码在 `delay`/`wait`/通道操作处挂起，
//! 只能由时钟发出的唤醒事件恢复。时钟用 no-op waker 逐个 poll 进程，
//! 整个过程是单线程、确定性的。

mod channel;
mod ctx;
mod future;
pub(crate) mod kernel;

pub use channel::Channel;
pub use ctx::ProcessCtx;
pub use future::{Delay, Put, Take, Wait};
pub use kernel::ProcessState;
