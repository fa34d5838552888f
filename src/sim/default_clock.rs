//! 默认时钟
//!
//! 每个线程一个默认时钟，供只需要单个仿真的调用方使用。引擎内部从不依赖它：
//! 所有动作都显式拿到 `&mut Clock`。时钟不是 `Send`，所以这里的"全局"是线程局部的。

use super::clock::Clock;
use std::cell::RefCell;

thread_local! {
    static DEFAULT_CLOCK: RefCell<Clock> = RefCell::new(Clock::default());
}

/// 在默认时钟上执行 `f`。
///
/// 不可嵌套调用（动作内部应使用传入的 `&mut Clock`），否则会因重复借用而 panic。
pub fn with_default_clock<R>(f: impl FnOnce(&mut Clock) -> R) -> R {
    DEFAULT_CLOCK.with(|clock| f(&mut clock.borrow_mut()))
}
