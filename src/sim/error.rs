//! 错误类型
//!
//! `SimError` 同步返回给调用者；`ActionFault` 由动作/进程体返回，
//! 在运行循环边界被捕获并记录为 [`Fault`]，不会中断仿真。

use super::clock::ClockState;
use super::id::{EntityId, ProcessId};
use super::time::SimTime;
use thiserror::Error;

/// 调度 API 与状态机的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("cannot schedule at {at}, clock is already at {now}")]
    InPast { at: SimTime, now: SimTime },

    #[error("simulation time overflow")]
    TimeOverflow,

    #[error("{op} requires an initialized clock")]
    NotInitialized { op: &'static str },

    #[error("{0} is not pending (already fired, cancelled or unknown)")]
    NotPending(EntityId),

    #[error("sampling period must be positive")]
    ZeroPeriod,

    #[error("cannot {op} while clock is {state:?}")]
    InvalidState {
        op: &'static str,
        state: ClockState,
    },

    #[error("unknown process {0:?}")]
    UnknownProcess(ProcessId),

    #[error("process {0:?} is not suspended")]
    ProcessNotSuspended(ProcessId),
}

impl SimError {
    /// 是否为时钟状态机违例（时钟状态保持不变）。
    pub fn is_state_violation(&self) -> bool {
        matches!(self, SimError::InvalidState { .. })
    }
}

/// 挂起的进程被 `interrupt` 强制唤醒时收到的信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("process interrupted")]
pub struct Interrupted;

/// 动作或进程体内部的故障。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionFault {
    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("{0}")]
    Failed(String),
}

impl ActionFault {
    pub fn msg(msg: impl Into<String>) -> Self {
        ActionFault::Failed(msg.into())
    }
}

/// 动作的返回值
pub type ActionResult = Result<(), ActionFault>;

/// 一条被记录的故障：哪个实体、在什么时刻、出了什么错。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub at: SimTime,
    pub source: EntityId,
    pub fault: ActionFault,
}
