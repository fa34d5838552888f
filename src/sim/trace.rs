//! 观测记录（结构化 JSON，可离线回放）
//!
//! 时钟只负责追加记录；存储格式与消费方式由外部决定（`records`/`take`/`clear`）。

use super::id::EntityId;
use super::time::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceKind {
    Scheduled { due: SimTime },
    Executed,
    Cancelled,
    ConditionFired,
    Sampled,
    ProcessSpawned { name: String },
    ProcessSuspended,
    ProcessResumed { interrupted: bool },
    ProcessFinished,
    ProcessFailed,
    Fault { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 记录发生时的仿真时间
    pub t: SimTime,
    pub entity: EntityId,
    #[serde(flatten)]
    pub kind: TraceKind,
}

/// 内存中的追加日志
#[derive(Debug, Default)]
pub struct TraceLog {
    enabled: bool,
    records: Vec<TraceRecord>,
}

impl TraceLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            records: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn record(&mut self, t: SimTime, entity: EntityId, kind: TraceKind) {
        if self.enabled {
            self.records.push(TraceRecord { t, entity, kind });
        }
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn take(&mut self) -> Vec<TraceRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
