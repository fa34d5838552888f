//! 标识符类型
//!
//! 时钟上注册的每个实体都有稳定的标识符，供日志/记录器引用。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 队列中调度事件的标识符（即其序列号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// 条件事件标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionId(pub u64);

/// 采样器标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SamplerId(pub u64);

/// 进程标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u64);

/// 任意已注册实体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityId {
    Event(EventId),
    Condition(ConditionId),
    Sampler(SamplerId),
    Process(ProcessId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Event(id) => write!(f, "event#{}", id.0),
            EntityId::Condition(id) => write!(f, "condition#{}", id.0),
            EntityId::Sampler(id) => write!(f, "sampler#{}", id.0),
            EntityId::Process(id) => write!(f, "process#{}", id.0),
        }
    }
}

impl From<EventId> for EntityId {
    fn from(id: EventId) -> Self {
        EntityId::Event(id)
    }
}

impl From<ConditionId> for EntityId {
    fn from(id: ConditionId) -> Self {
        EntityId::Condition(id)
    }
}

impl From<SamplerId> for EntityId {
    fn from(id: SamplerId) -> Self {
        EntityId::Sampler(id)
    }
}

impl From<ProcessId> for EntityId {
    fn from(id: ProcessId) -> Self {
        EntityId::Process(id)
    }
}
