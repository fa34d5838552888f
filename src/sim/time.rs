//! 仿真时间类型
//!
//! 定义仿真时间（以 tick 计）以及 tick 所代表的时间单位。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真时间（tick）。一个 tick 的物理含义由时钟的 [`TimeUnit`] 决定。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    pub fn ticks(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, delta: SimTime) -> Option<SimTime> {
        self.0.checked_add(delta.0).map(SimTime)
    }

    pub fn saturating_add(self, delta: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(delta.0))
    }

    /// `self - earlier`，若 `earlier` 更晚则返回 0。
    pub fn saturating_sub(self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }

    /// 把 `self`（以 `from` 为单位）换算成以 `to` 为单位的 tick 数。
    /// 向下取整，溢出时饱和。
    pub fn convert(self, from: TimeUnit, to: TimeUnit) -> SimTime {
        SimTime(to.from_nanos(from.to_nanos(self.0)))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// 时间单位标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Nanos,
    Micros,
    Millis,
    Secs,
}

impl TimeUnit {
    fn nanos_per_unit(self) -> u64 {
        match self {
            TimeUnit::Nanos => 1,
            TimeUnit::Micros => 1_000,
            TimeUnit::Millis => 1_000_000,
            TimeUnit::Secs => 1_000_000_000,
        }
    }

    fn to_nanos(self, amount: u64) -> u64 {
        amount.saturating_mul(self.nanos_per_unit())
    }

    fn from_nanos(self, nanos: u64) -> u64 {
        nanos / self.nanos_per_unit()
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanos => "ns",
            TimeUnit::Micros => "us",
            TimeUnit::Millis => "ms",
            TimeUnit::Secs => "s",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "ns" | "nanos" => Ok(TimeUnit::Nanos),
            "us" | "micros" => Ok(TimeUnit::Micros),
            "ms" | "millis" => Ok(TimeUnit::Millis),
            "s" | "secs" => Ok(TimeUnit::Secs),
            _ => Err(format!("unknown time unit: {raw}")),
        }
    }
}
