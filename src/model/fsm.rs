//! 状态转移建模
//!
//! 显式的 `(State, Event) -> (State, 可选后续动作)` 转移表。
//! 表中没有的组合按 [`Fallback`] 处理。后续动作被调度到当前时刻执行，
//! 排在正在执行的动作之后。

use crate::sim::{ActionFault, ActionResult, Clock, SimError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// 后续动作，参数为 `(转移前状态, 触发事件)`
pub type FollowUp<S, E> = Rc<dyn Fn(&mut Clock, S, E) -> ActionResult>;

/// 未登记的 `(state, event)` 组合如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// 保持当前状态，不做任何事
    Ignore,
    /// 返回 [`FsmError::Unhandled`]
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("{machine}: no transition from {state} on {event}")]
    Unhandled {
        machine: String,
        state: String,
        event: String,
    },

    #[error(transparent)]
    Sim(#[from] SimError),
}

impl From<FsmError> for ActionFault {
    fn from(err: FsmError) -> Self {
        match err {
            FsmError::Sim(err) => ActionFault::Sim(err),
            other => ActionFault::Failed(other.to_string()),
        }
    }
}

/// 一次 `fire` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<S> {
    Moved { from: S, to: S },
    Ignored { state: S },
}

struct Transition<S, E> {
    next: S,
    follow_up: Option<FollowUp<S, E>>,
}

pub struct StateMachine<S, E> {
    name: String,
    state: S,
    table: HashMap<(S, E), Transition<S, E>>,
    fallback: Fallback,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug + 'static,
    E: Copy + Eq + Hash + Debug + 'static,
{
    pub fn new(name: impl Into<String>, initial: S, fallback: Fallback) -> Self {
        Self {
            name: name.into(),
            state: initial,
            table: HashMap::new(),
            fallback,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// 登记转移 `from --event--> to`。重复登记覆盖旧的转移。
    pub fn on(&mut self, from: S, event: E, to: S) -> &mut Self {
        self.table.insert(
            (from, event),
            Transition {
                next: to,
                follow_up: None,
            },
        );
        self
    }

    /// 登记带后续动作的转移。
    pub fn on_with<F>(&mut self, from: S, event: E, to: S, follow_up: F) -> &mut Self
    where
        F: Fn(&mut Clock, S, E) -> ActionResult + 'static,
    {
        self.table.insert(
            (from, event),
            Transition {
                next: to,
                follow_up: Some(Rc::new(follow_up)),
            },
        );
        self
    }

    pub fn handles(&self, state: S, event: E) -> bool {
        self.table.contains_key(&(state, event))
    }

    /// 在当前状态上投递事件。
    pub fn fire(&mut self, clock: &mut Clock, event: E) -> Result<Outcome<S>, FsmError> {
        let from = self.state;
        let Some(transition) = self.table.get(&(from, event)) else {
            return match self.fallback {
                Fallback::Ignore => {
                    debug!(machine = %self.name, ?from, ?event, "未登记的转移，忽略");
                    Ok(Outcome::Ignored { state: from })
                }
                Fallback::Reject => Err(FsmError::Unhandled {
                    machine: self.name.clone(),
                    state: format!("{from:?}"),
                    event: format!("{event:?}"),
                }),
            };
        };

        let to = transition.next;
        if let Some(follow_up) = transition.follow_up.clone() {
            let now = clock.now();
            clock.schedule_fn_at(now, move |clock: &mut Clock| follow_up(clock, from, event))?;
        }
        self.state = to;
        debug!(machine = %self.name, ?from, ?event, ?to, now = ?clock.now(), "状态转移");
        Ok(Outcome::Moved { from, to })
    }
}
