//! 建立在时钟之上的建模风格：状态转移表与定时活动。

pub mod activity;
pub mod fsm;

pub use activity::{Activity, ActivityStatus};
pub use fsm::{Fallback, FollowUp, FsmError, Outcome, StateMachine};
