//! 时钟
//!
//! 维护当前时间、事件队列、条件表、采样表与进程表，驱动运行循环。
//! 时钟不是线程安全的：同一时刻只能有一个控制流驱动它。

use super::conditional::{ConditionalEntry, ConditionalRegistry};
use super::config::{ClockConfig, IdleAdvance};
use super::error::{ActionFault, ActionResult, Fault, SimError};
use super::event::{Event, FnEvent};
use super::id::{ConditionId, EntityId, EventId, ProcessId, SamplerId};
use super::queue::EventQueue;
use super::sampling::SamplingRegistry;
use super::scheduled_event::ScheduledEvent;
use super::time::{SimTime, TimeUnit};
use super::trace::{TraceKind, TraceLog, TraceRecord};
use crate::process::kernel::{Kernel, ProcessState, Request, Signal};
use crate::process::{Channel, ProcessCtx};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use tracing::{debug, error, info, trace, warn};

/// 时钟运行状态
///
/// `Undefined → Idle → Running → Idle`，`Running → Halted → Running`，
/// 任意非运行状态经 `reset` 回到 `Undefined`。`Busy` 表示正在执行单个动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    Undefined,
    Idle,
    Running,
    Busy,
    Halted,
}

/// 一次 `run`/`resume` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunReport {
    /// 执行的离散事件数（队列条目，包括进程唤醒）
    pub events_executed: u64,
    pub conditions_fired: u64,
    pub samples_taken: u64,
    pub final_time: SimTime,
    /// 是否因 `stop` 而停下
    pub halted: bool,
}

type ProcessFuture = Pin<Box<dyn Future<Output = ActionResult>>>;

/// 挂起进程登记的唤醒方式
enum PendingWake {
    Timer(EventId),
    Condition(ConditionId),
    Blocked,
}

struct ProcessRecord {
    name: String,
    future: Option<ProcessFuture>,
    pending: Option<PendingWake>,
}

/// 事件：恢复一个进程。
struct ResumeProcess {
    pid: ProcessId,
}

impl Event for ResumeProcess {
    fn execute(self: Box<Self>, clock: &mut Clock) -> ActionResult {
        clock.resume_process(self.pid, Signal::Resume);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "resume_process"
    }
}

pub struct Clock {
    config: ClockConfig,
    now: SimTime,
    unit: TimeUnit,
    state: ClockState,
    queue: EventQueue,
    conditionals: ConditionalRegistry,
    samplers: SamplingRegistry,
    processes: BTreeMap<ProcessId, ProcessRecord>,
    next_pid: u64,
    kernel: Rc<Kernel>,
    /// 当前（或被 stop 打断的）运行的目标时间
    target: Option<SimTime>,
    faults: Vec<Fault>,
    trace: TraceLog,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

impl Clock {
    /// 创建一个处于 `Undefined` 状态的时钟，需先 `initialize`。
    pub fn new(config: ClockConfig) -> Self {
        let kernel = Rc::new(Kernel::default());
        kernel.set_now(config.start_time);
        Self {
            now: config.start_time,
            unit: config.time_unit,
            state: ClockState::Undefined,
            queue: EventQueue::new(),
            conditionals: ConditionalRegistry::default(),
            samplers: SamplingRegistry::default(),
            processes: BTreeMap::new(),
            next_pid: 0,
            kernel,
            target: None,
            faults: Vec::new(),
            trace: TraceLog::new(config.trace),
            config,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.unit
    }

    /// 修改 tick 的单位标签，不改变已有的 tick 数值。
    pub fn set_time_unit(&mut self, unit: TimeUnit) -> Result<(), SimError> {
        if matches!(self.state, ClockState::Running | ClockState::Busy) {
            return Err(SimError::InvalidState {
                op: "set_time_unit",
                state: self.state,
            });
        }
        self.unit = unit;
        Ok(())
    }

    /// 把 `amount` 个 `unit` 换算成本时钟的 tick。
    pub fn time(&self, amount: u64, unit: TimeUnit) -> SimTime {
        SimTime(amount).convert(unit, self.unit)
    }

    /// `Undefined → Idle`
    pub fn initialize(&mut self) -> Result<(), SimError> {
        if self.state != ClockState::Undefined {
            return Err(SimError::InvalidState {
                op: "initialize",
                state: self.state,
            });
        }
        self.advance_to(self.config.start_time);
        self.state = ClockState::Idle;
        debug!(now = ?self.now, "时钟初始化");
        Ok(())
    }

    /// 清空队列、条件表、采样表、进程表与故障记录，时间与单位回到配置值，状态回到 `Undefined`。
    /// 标识符计数器不归零：重置前发出的句柄不会指向重置后注册的实体。
    /// 观测记录不受影响，由使用者自行 `clear_trace`。
    pub fn reset(&mut self) -> Result<(), SimError> {
        if matches!(self.state, ClockState::Running | ClockState::Busy) {
            return Err(SimError::InvalidState {
                op: "reset",
                state: self.state,
            });
        }
        self.queue.clear();
        self.conditionals.clear();
        self.samplers.clear();
        self.processes.clear();
        self.kernel.clear();
        self.target = None;
        self.faults.clear();
        self.now = self.config.start_time;
        self.unit = self.config.time_unit;
        self.kernel.set_now(self.now);
        self.state = ClockState::Undefined;
        info!("🔄 时钟已重置");
        Ok(())
    }

    fn ensure_initialized(&self, op: &'static str) -> Result<(), SimError> {
        if self.state == ClockState::Undefined {
            return Err(SimError::NotInitialized { op });
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // 调度 API
    // ---------------------------------------------------------------

    /// 调度事件在指定时间执行
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule_at<E: Event>(&mut self, at: SimTime, ev: E) -> Result<EventId, SimError> {
        self.ensure_initialized("schedule")?;
        if at < self.now {
            return Err(SimError::InPast { at, now: self.now });
        }
        Ok(self.push_event(at, Box::new(ev)))
    }

    /// 调度事件在 `now + delay` 执行
    pub fn schedule_after<E: Event>(&mut self, delay: SimTime, ev: E) -> Result<EventId, SimError> {
        let at = self.now.checked_add(delay).ok_or(SimError::TimeOverflow)?;
        self.schedule_at(at, ev)
    }

    pub fn schedule_fn_at<F>(&mut self, at: SimTime, f: F) -> Result<EventId, SimError>
    where
        F: FnOnce(&mut Clock) -> ActionResult + 'static,
    {
        self.schedule_at(at, FnEvent(f))
    }

    pub fn schedule_fn_after<F>(&mut self, delay: SimTime, f: F) -> Result<EventId, SimError>
    where
        F: FnOnce(&mut Clock) -> ActionResult + 'static,
    {
        self.schedule_after(delay, FnEvent(f))
    }

    fn push_event(&mut self, at: SimTime, ev: Box<dyn Event>) -> EventId {
        let name = ev.name();
        let id = self.queue.push(at, ev);
        trace!(now = ?self.now, seq = id.0, event = name, "调度事件");
        debug!(queue_size = self.queue.len(), "事件已加入队列");
        self.trace
            .record(self.now, id.into(), TraceKind::Scheduled { due: at });
        id
    }

    /// 取消一个尚未执行的事件。
    pub fn cancel(&mut self, id: EventId) -> Result<(), SimError> {
        if !self.queue.cancel(id) {
            return Err(SimError::NotPending(id.into()));
        }
        debug!(seq = id.0, remaining_queue = self.queue.len(), "事件已取消");
        self.trace.record(self.now, id.into(), TraceKind::Cancelled);
        Ok(())
    }

    /// 登记条件事件：谓词成立时执行一次动作，然后移除。
    pub fn schedule_conditional<P, F>(&mut self, predicate: P, action: F) -> Result<ConditionId, SimError>
    where
        P: FnMut() -> bool + 'static,
        F: FnOnce(&mut Clock) -> ActionResult + 'static,
    {
        self.ensure_initialized("schedule_conditional")?;
        let id = self
            .conditionals
            .insert(Box::new(predicate), Box::new(FnEvent(action)));
        debug!(cond = id.0, pending = self.conditionals.len(), "登记条件事件");
        Ok(id)
    }

    pub fn cancel_conditional(&mut self, id: ConditionId) -> Result<(), SimError> {
        if !self.conditionals.remove(id) {
            return Err(SimError::NotPending(id.into()));
        }
        self.trace.record(self.now, id.into(), TraceKind::Cancelled);
        Ok(())
    }

    /// 登记采样动作：首次在 `now + period` 执行，此后每隔 `period` 执行一次。
    pub fn schedule_sampling<F>(&mut self, period: SimTime, action: F) -> Result<SamplerId, SimError>
    where
        F: FnMut(&mut Clock) -> ActionResult + 'static,
    {
        self.ensure_initialized("schedule_sampling")?;
        if period == SimTime::ZERO {
            return Err(SimError::ZeroPeriod);
        }
        let first_at = self.now.checked_add(period).ok_or(SimError::TimeOverflow)?;
        let id = self.samplers.insert(period, first_at, Box::new(action));
        debug!(sampler = id.0, period = ?period, first_at = ?first_at, "登记采样器");
        Ok(id)
    }

    pub fn remove_sampler(&mut self, id: SamplerId) -> Result<(), SimError> {
        if !self.samplers.remove(id) {
            return Err(SimError::NotPending(id.into()));
        }
        self.trace.record(self.now, id.into(), TraceKind::Cancelled);
        Ok(())
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn next_event_due(&self) -> Option<SimTime> {
        self.queue.peek_next_due()
    }

    pub fn pending_conditions(&self) -> usize {
        self.conditionals.len()
    }

    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    // ---------------------------------------------------------------
    // 运行循环
    // ---------------------------------------------------------------

    /// 运行 `duration` 个 tick。
    pub fn run_for(&mut self, duration: SimTime) -> Result<RunReport, SimError> {
        self.run_until(self.now.saturating_add(duration))
    }

    /// 运行直到没有 `<= until` 的工作，或被 `stop`。
    #[tracing::instrument(skip(self), fields(now = ?self.now))]
    pub fn run_until(&mut self, until: SimTime) -> Result<RunReport, SimError> {
        if self.state != ClockState::Idle {
            return Err(SimError::InvalidState {
                op: "run",
                state: self.state,
            });
        }
        if until <= self.now {
            debug!("目标时间不晚于当前时间，直接返回");
            return Ok(RunReport {
                final_time: self.now,
                ..RunReport::default()
            });
        }
        self.target = Some(until);
        self.state = ClockState::Running;
        Ok(self.drive(until))
    }

    /// `Running/Busy → Halted`。通常在动作内部调用；当前动作执行完后运行循环退出。
    pub fn stop(&mut self) -> Result<(), SimError> {
        match self.state {
            ClockState::Running | ClockState::Busy => {
                self.state = ClockState::Halted;
                info!(now = ?self.now, "⏸️  仿真暂停");
                Ok(())
            }
            state => Err(SimError::InvalidState { op: "stop", state }),
        }
    }

    /// `Halted → Running`，继续被打断的运行直到原来的目标时间。
    pub fn resume(&mut self) -> Result<RunReport, SimError> {
        if self.state != ClockState::Halted {
            return Err(SimError::InvalidState {
                op: "resume",
                state: self.state,
            });
        }
        let until = self.target.unwrap_or(self.now);
        self.state = ClockState::Running;
        Ok(self.drive(until))
    }

    fn drive(&mut self, until: SimTime) -> RunReport {
        info!(now = ?self.now, until = ?until, queue_size = self.queue.len(), "▶️  开始运行仿真");
        let mut report = RunReport::default();

        self.process_requests();
        self.sweep_conditionals(&mut report);

        while self.state == ClockState::Running {
            let Some(t) = self.next_instant(until) else {
                break;
            };
            self.advance_to(t);

            while self.state == ClockState::Running {
                let Some(item) = self.queue.pop_next_due(t) else {
                    break;
                };
                report.events_executed += 1;
                self.execute_event(item);
            }

            self.sweep_conditionals(&mut report);
            if self.service_samplers(&mut report) > 0 {
                self.sweep_conditionals(&mut report);
            }
        }

        if self.state == ClockState::Running {
            if self.config.idle_advance == IdleAdvance::JumpToTarget {
                self.advance_to(until);
            }
            self.state = ClockState::Idle;
            self.target = None;
        }

        report.final_time = self.now;
        report.halted = self.state == ClockState::Halted;
        info!(
            total_events = report.events_executed,
            conditions_fired = report.conditions_fired,
            samples_taken = report.samples_taken,
            final_time = ?self.now,
            halted = report.halted,
            "✅ 仿真完成"
        );
        report
    }

    /// 下一个有工作的时刻（不超过 `until`）。
    fn next_instant(&self, until: SimTime) -> Option<SimTime> {
        let mut candidates = vec![self.queue.peek_next_due(), self.samplers.next_fire()];
        if let Some(tick) = self.config.condition_tick {
            if tick > SimTime::ZERO && !self.conditionals.is_empty() {
                let step = self.now.saturating_add(tick).min(until);
                if step > self.now {
                    candidates.push(Some(step));
                }
            }
        }
        candidates
            .into_iter()
            .flatten()
            .min()
            .filter(|t| *t <= until)
    }

    fn advance_to(&mut self, t: SimTime) {
        if t > self.now {
            trace!(from = ?self.now, to = ?t, "推进时间");
            self.now = t;
        }
        self.kernel.set_now(self.now);
    }

    fn enter_action(&mut self) -> ClockState {
        let prev = self.state;
        if prev == ClockState::Running {
            self.state = ClockState::Busy;
        }
        prev
    }

    fn leave_action(&mut self, prev: ClockState) {
        if self.state == ClockState::Busy {
            self.state = prev;
        }
    }

    /// 执行一个动作并在边界处捕获故障，随后处理进程请求。
    fn run_action(&mut self, source: EntityId, action: impl FnOnce(&mut Clock) -> ActionResult) {
        let prev = self.enter_action();
        let result = action(self);
        self.leave_action(prev);
        if let Err(fault) = result {
            self.report_fault(source, fault);
        }
        self.process_requests();
    }

    fn execute_event(&mut self, item: ScheduledEvent) {
        let id = item.id();
        debug!(
            now = ?self.now,
            seq = id.0,
            event = item.name(),
            remaining_queue = self.queue.len(),
            "执行事件"
        );
        self.trace.record(self.now, id.into(), TraceKind::Executed);
        let ScheduledEvent { ev, .. } = item;
        self.run_action(id.into(), |clock| ev.execute(clock));
    }

    /// 反复扫描条件表直到一整轮没有条件触发。
    fn sweep_conditionals(&mut self, report: &mut RunReport) {
        loop {
            let mut fired = 0usize;
            for id in self.conditionals.ids() {
                if self.state != ClockState::Running {
                    return;
                }
                let Some(ConditionalEntry {
                    mut predicate,
                    action,
                }) = self.conditionals.take(id)
                else {
                    continue;
                };
                if !predicate() {
                    self.conditionals
                        .restore(id, ConditionalEntry { predicate, action });
                    continue;
                }
                self.conditionals.remove(id);
                fired += 1;
                report.conditions_fired += 1;
                debug!(cond = id.0, now = ?self.now, "条件成立，触发动作");
                self.trace.record(self.now, id.into(), TraceKind::ConditionFired);
                self.run_action(id.into(), |clock| action.execute(clock));
            }
            if fired == 0 {
                break;
            }
            trace!(fired, "条件扫描未到不动点，继续");
        }
    }

    /// 执行所有到期的采样器，并在 `now + period` 重新挂起。
    fn service_samplers(&mut self, report: &mut RunReport) -> usize {
        let mut taken = 0usize;
        for id in self.samplers.due(self.now) {
            if self.state != ClockState::Running {
                break;
            }
            let Some(mut entry) = self.samplers.take(id) else {
                continue;
            };
            entry.next_at = self.now.saturating_add(entry.period);
            taken += 1;
            report.samples_taken += 1;
            trace!(sampler = id.0, now = ?self.now, next_at = ?entry.next_at, "采样");
            self.trace.record(self.now, id.into(), TraceKind::Sampled);
            self.run_action(id.into(), |clock| (entry.action)(clock));
            self.samplers.restore(id, entry);
        }
        taken
    }

    // ---------------------------------------------------------------
    // 故障与观测
    // ---------------------------------------------------------------

    fn report_fault(&mut self, source: EntityId, fault: ActionFault) {
        warn!(%source, %fault, now = ?self.now, "⚠️  动作执行失败");
        self.trace.record(
            self.now,
            source,
            TraceKind::Fault {
                message: fault.to_string(),
            },
        );
        self.faults.push(Fault {
            at: self.now,
            source,
            fault,
        });
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn take_faults(&mut self) -> Vec<Fault> {
        std::mem::take(&mut self.faults)
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace.set_enabled(enabled);
    }

    pub fn take_trace(&mut self) -> Vec<TraceRecord> {
        self.trace.take()
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    // ---------------------------------------------------------------
    // 进程
    // ---------------------------------------------------------------

    /// 创建一个进程。进程体在 `start_processes` 之后的第一个事件中开始执行。
    pub fn spawn_process<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<ProcessId, SimError>
    where
        F: FnOnce(ProcessCtx) -> Fut,
        Fut: Future<Output = ActionResult> + 'static,
    {
        self.ensure_initialized("spawn_process")?;
        let pid = ProcessId(self.next_pid);
        self.next_pid = self.next_pid.wrapping_add(1);
        let name = name.into();
        let future: ProcessFuture = Box::pin(body(ProcessCtx::new(pid, Rc::clone(&self.kernel))));
        self.kernel.set_state(pid, ProcessState::Created);
        debug!(?pid, name = %name, "创建进程");
        self.trace.record(
            self.now,
            pid.into(),
            TraceKind::ProcessSpawned { name: name.clone() },
        );
        self.processes.insert(
            pid,
            ProcessRecord {
                name,
                future: Some(future),
                pending: None,
            },
        );
        Ok(pid)
    }

    /// 为所有尚未启动的进程在当前时刻调度启动事件（按创建顺序）。
    pub fn start_processes(&mut self) -> Result<usize, SimError> {
        self.ensure_initialized("start_processes")?;
        let created: Vec<ProcessId> = self
            .processes
            .keys()
            .copied()
            .filter(|pid| self.kernel.state(*pid) == Some(ProcessState::Created))
            .collect();
        let now = self.now;
        for pid in &created {
            let eid = self.push_event(now, Box::new(ResumeProcess { pid: *pid }));
            self.kernel.set_state(*pid, ProcessState::Scheduled);
            self.set_pending(*pid, PendingWake::Timer(eid));
        }
        info!(count = created.len(), now = ?now, "🚀 启动进程");
        Ok(created.len())
    }

    pub fn process_state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.kernel.state(pid)
    }

    pub fn process_name(&self, pid: ProcessId) -> Option<&str> {
        self.processes.get(&pid).map(|r| r.name.as_str())
    }

    /// 取消挂起进程的唤醒条目，并立即以中断信号恢复它。
    pub fn interrupt(&mut self, pid: ProcessId) -> Result<(), SimError> {
        self.ensure_initialized("interrupt")?;
        if !self.processes.contains_key(&pid) {
            return Err(SimError::UnknownProcess(pid));
        }
        if self.kernel.state(pid) != Some(ProcessState::Suspended) {
            return Err(SimError::ProcessNotSuspended(pid));
        }
        let pending = self
            .processes
            .get_mut(&pid)
            .and_then(|record| record.pending.take());
        match pending {
            Some(PendingWake::Timer(eid)) => {
                if self.queue.cancel(eid) {
                    self.trace.record(self.now, eid.into(), TraceKind::Cancelled);
                }
            }
            Some(PendingWake::Condition(cid)) => {
                if self.conditionals.remove(cid) {
                    self.trace.record(self.now, cid.into(), TraceKind::Cancelled);
                }
            }
            Some(PendingWake::Blocked) | None => {}
        }
        info!(?pid, now = ?self.now, "⚡ 中断进程");
        self.resume_process(pid, Signal::Interrupt);
        Ok(())
    }

    /// 创建一个绑定到本时钟的通道。`capacity` 为 `None` 表示无界。
    pub fn channel<T>(&self, capacity: Option<usize>) -> Channel<T> {
        Channel::new(Rc::clone(&self.kernel), capacity)
    }

    fn set_pending(&mut self, pid: ProcessId, wake: PendingWake) {
        if let Some(record) = self.processes.get_mut(&pid) {
            record.pending = Some(wake);
        }
    }

    /// poll 一次进程，直到它再次挂起或结束。
    fn resume_process(&mut self, pid: ProcessId, signal: Signal) {
        let Some(record) = self.processes.get_mut(&pid) else {
            warn!(?pid, "恢复未知进程");
            return;
        };
        record.pending = None;
        let Some(mut future) = record.future.take() else {
            warn!(?pid, "进程已结束，忽略恢复");
            return;
        };

        let interrupted = signal == Signal::Interrupt;
        trace!(?pid, interrupted, now = ?self.now, "恢复进程");
        self.trace.record(
            self.now,
            pid.into(),
            TraceKind::ProcessResumed { interrupted },
        );
        self.kernel.set_signal(pid, signal);
        self.kernel.set_state(pid, ProcessState::Running);

        let prev = self.enter_action();
        let poll = future.as_mut().poll(&mut Context::from_waker(Waker::noop()));
        self.leave_action(prev);
        // 未被消费的信号作废
        self.kernel.take_signal(pid);

        match poll {
            Poll::Pending => {
                self.kernel.set_state(pid, ProcessState::Suspended);
                if let Some(record) = self.processes.get_mut(&pid) {
                    record.future = Some(future);
                }
                self.trace
                    .record(self.now, pid.into(), TraceKind::ProcessSuspended);
            }
            Poll::Ready(Ok(())) => {
                self.kernel.set_state(pid, ProcessState::Finished);
                debug!(?pid, now = ?self.now, "进程结束");
                self.trace
                    .record(self.now, pid.into(), TraceKind::ProcessFinished);
            }
            Poll::Ready(Err(fault)) => {
                self.kernel.set_state(pid, ProcessState::Failed);
                error!(?pid, %fault, now = ?self.now, "❌ 进程失败");
                self.trace
                    .record(self.now, pid.into(), TraceKind::ProcessFailed);
                self.report_fault(pid.into(), fault);
            }
        }

        self.process_requests();

        let stalled = self.kernel.state(pid) == Some(ProcessState::Suspended)
            && self
                .processes
                .get(&pid)
                .is_some_and(|record| record.pending.is_none());
        if stalled {
            warn!(?pid, "进程挂起但没有登记任何唤醒");
        }
    }

    /// 处理进程通过信箱提出的请求。
    fn process_requests(&mut self) {
        while let Some(req) = self.kernel.pop_request() {
            match req {
                Request::Delay { pid, until } => {
                    let at = until.max(self.now);
                    let eid = self.push_event(at, Box::new(ResumeProcess { pid }));
                    self.set_pending(pid, PendingWake::Timer(eid));
                }
                Request::Wait { pid, predicate } => {
                    let cid = self
                        .conditionals
                        .insert(predicate, Box::new(ResumeProcess { pid }));
                    self.set_pending(pid, PendingWake::Condition(cid));
                }
                Request::Block { pid } => {
                    trace!(?pid, "进程阻塞在通道上");
                    self.set_pending(pid, PendingWake::Blocked);
                }
                Request::Wake { pid } => {
                    let blocked = self
                        .processes
                        .get(&pid)
                        .is_some_and(|record| matches!(record.pending, Some(PendingWake::Blocked)));
                    if blocked {
                        let now = self.now;
                        let eid = self.push_event(now, Box::new(ResumeProcess { pid }));
                        self.set_pending(pid, PendingWake::Timer(eid));
                    }
                }
                Request::Interrupt { pid, from } => {
                    if let Err(err) = self.interrupt(pid) {
                        warn!(?pid, ?from, %err, "中断请求失败");
                        self.report_fault(from.into(), err.into());
                    }
                }
            }
        }
    }
}
