//! 事件 trait
//!
//! 定义仿真事件接口。

use super::clock::Clock;
use super::error::ActionResult;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: 'static {
    fn execute(self: Box<Self>, clock: &mut Clock) -> ActionResult;

    /// 用于日志的名字
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 把一次性闭包包装成事件。
pub(crate) struct FnEvent<F>(pub(crate) F);

impl<F> Event for FnEvent<F>
where
    F: FnOnce(&mut Clock) -> ActionResult + 'static,
{
    fn execute(self: Box<Self>, clock: &mut Clock) -> ActionResult {
        let FnEvent(f) = *self;
        f(clock)
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}
