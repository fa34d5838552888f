//! 演示和示例代码
//!
//! 包含可复用的模型构建函数，供二进制程序与测试共享。

use crate::process::{Channel, ProcessCtx};
use crate::sim::{ActionResult, Clock, ProcessId, SimError, SimTime};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// 乒乓模型配置
#[derive(Debug, Clone)]
pub struct PingPongOpts {
    /// 进程 A 在 take 与 put 之间的延迟
    pub delay_a: SimTime,
    /// 进程 B 在 take 与 put 之间的延迟
    pub delay_b: SimTime,
    /// 通道初始元素个数
    pub seed_items: u64,
    /// 通道容量，`None` 为无界
    pub capacity: Option<usize>,
    /// 通道长度的采样周期，`None` 表示不采样
    pub sample_period: Option<SimTime>,
    pub until: SimTime,
}

impl Default for PingPongOpts {
    fn default() -> Self {
        Self {
            delay_a: SimTime(2),
            delay_b: SimTime(3),
            seed_items: 1,
            capacity: None,
            sample_period: None,
            until: SimTime(100),
        }
    }
}

/// 乒乓模型统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct PingPongStats {
    pub exchanges_a: u64,
    pub exchanges_b: u64,
    pub last_value: u64,
    /// 每次采样时通道中的元素个数
    pub queue_samples: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    A,
    B,
}

/// 乒乓模型句柄
pub struct PingPong {
    pub stats: Rc<RefCell<PingPongStats>>,
    pub chan: Channel<u64>,
    pub a: ProcessId,
    pub b: ProcessId,
}

async fn exchanger(
    ctx: ProcessCtx,
    chan: Channel<u64>,
    pause: SimTime,
    side: Side,
    stats: Rc<RefCell<PingPongStats>>,
) -> ActionResult {
    loop {
        let value = ctx.take(&chan).await?;
        ctx.delay(pause).await?;
        ctx.put(&chan, value.saturating_add(1)).await?;

        let mut s = stats.borrow_mut();
        match side {
            Side::A => s.exchanges_a += 1,
            Side::B => s.exchanges_b += 1,
        }
        s.last_value = value.saturating_add(1);
    }
}

/// 构建乒乓模型：两个进程通过一个共享通道来回传递一个递增的值。
///
/// 进程已 spawn 并 `start_processes`，调用方只需运行时钟。
pub fn build_ping_pong(clock: &mut Clock, opts: &PingPongOpts) -> Result<PingPong, SimError> {
    let stats = Rc::new(RefCell::new(PingPongStats::default()));
    let chan = clock.channel::<u64>(opts.capacity);
    for value in 0..opts.seed_items {
        if chan.try_put(value).is_err() {
            break;
        }
    }

    let a = {
        let (chan, stats, pause) = (chan.clone(), Rc::clone(&stats), opts.delay_a);
        clock.spawn_process("ping", move |ctx| exchanger(ctx, chan, pause, Side::A, stats))?
    };
    let b = {
        let (chan, stats, pause) = (chan.clone(), Rc::clone(&stats), opts.delay_b);
        clock.spawn_process("pong", move |ctx| exchanger(ctx, chan, pause, Side::B, stats))?
    };

    if let Some(period) = opts.sample_period {
        let (chan, stats) = (chan.clone(), Rc::clone(&stats));
        clock.schedule_sampling(period, move |_clock: &mut Clock| {
            stats.borrow_mut().queue_samples.push(chan.len());
            Ok(())
        })?;
    }

    clock.start_processes()?;
    Ok(PingPong { stats, chan, a, b })
}
