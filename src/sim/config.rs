//! 时钟配置

use super::time::{SimTime, TimeUnit};
use serde::{Deserialize, Serialize};

/// 在目标时间之前已经没有任何工作时，`now` 停在哪里。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleAdvance {
    /// 停在最后一次执行的时刻
    #[default]
    StayAtLastEvent,
    /// 直接跳到目标时间
    JumpToTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// `initialize`/`reset` 后的起始时间
    pub start_time: SimTime,
    pub time_unit: TimeUnit,
    /// 只剩条件事件待决时，时钟以该步长推进并重新扫描条件；
    /// `None` 表示条件只在其他工作推进时间时被扫描。
    pub condition_tick: Option<SimTime>,
    pub idle_advance: IdleAdvance,
    /// 是否记录 [`TraceLog`](super::TraceLog)
    pub trace: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_time: SimTime::ZERO,
            time_unit: TimeUnit::Nanos,
            condition_tick: None,
            idle_advance: IdleAdvance::StayAtLastEvent,
            trace: false,
        }
    }
}
