//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、事件、事件队列、条件表、
//! 采样表与驱动它们的时钟。

// 子模块声明
mod clock;
mod conditional;
mod config;
mod default_clock;
mod error;
mod event;
mod id;
mod queue;
mod sampling;
mod scheduled_event;
mod slots;
mod time;
mod trace;

// 重新导出公共接口
pub use clock::{Clock, ClockState, RunReport};
pub use conditional::Predicate;
pub use config::{ClockConfig, IdleAdvance};
pub use default_clock::with_default_clock;
pub use error::{ActionFault, ActionResult, Fault, Interrupted, SimError};
pub use event::Event;
pub use id::{ConditionId, EntityId, EventId, ProcessId, SamplerId};
pub use queue::EventQueue;
pub use sampling::SampleFn;
pub use scheduled_event::ScheduledEvent;
pub use time::{SimTime, TimeUnit};
pub use trace::{TraceKind, TraceLog, TraceRecord};
