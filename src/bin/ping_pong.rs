//! 乒乓仿真
//!
//! 两个进程通过一个共享通道交换递增的值，每个进程在 take 与 put 之间延迟固定时长。

use clap::Parser;
use dsim_rs::demo::{PingPongOpts, build_ping_pong};
use dsim_rs::sim::{Clock, ClockConfig, IdleAdvance, RunReport, SimTime, TimeUnit};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ping-pong", about = "两个进程经共享通道交换数值")]
struct Args {
    /// 时钟配置 JSON（ClockConfig）
    #[arg(long)]
    config: Option<PathBuf>,

    /// tick 单位：ns/us/ms/s（覆盖配置文件）
    #[arg(long)]
    time_unit: Option<String>,

    /// 进程 A 在 take 与 put 之间的延迟（tick）
    #[arg(long, default_value_t = 2)]
    delay_a: u64,

    /// 进程 B 在 take 与 put 之间的延迟（tick）
    #[arg(long, default_value_t = 3)]
    delay_b: u64,

    /// 通道初始元素个数
    #[arg(long, default_value_t = 1)]
    seed_items: u64,

    /// 通道容量，缺省为无界
    #[arg(long)]
    capacity: Option<usize>,

    /// 通道长度采样周期（tick）
    #[arg(long)]
    sample_period: Option<u64>,

    /// 仿真运行到多少 tick
    #[arg(long, default_value_t = 100)]
    until: u64,

    /// 运行结束后把 now 推进到 --until
    #[arg(long)]
    jump_to_until: bool,

    /// 输出运行报告 JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// 输出观测记录 JSON
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    run: RunReport,
    exchanges_a: u64,
    exchanges_b: u64,
    last_value: u64,
    queue_len: usize,
    queue_samples: Vec<usize>,
    faults: usize,
}

fn load_config(args: &Args) -> Result<ClockConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("read {}: {e}", path.display()))?;
            serde_json::from_str(&raw).map_err(|e| format!("parse {}: {e}", path.display()))?
        }
        None => ClockConfig::default(),
    };
    if let Some(unit) = &args.time_unit {
        config.time_unit = TimeUnit::parse(unit)?;
    }
    if args.jump_to_until {
        config.idle_advance = IdleAdvance::JumpToTarget;
    }
    if args.trace_json.is_some() {
        config.trace = true;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<Report, String> {
    let config = load_config(args)?;
    let mut clock = Clock::new(config);
    clock.initialize().map_err(|e| e.to_string())?;

    let opts = PingPongOpts {
        delay_a: SimTime(args.delay_a),
        delay_b: SimTime(args.delay_b),
        seed_items: args.seed_items,
        capacity: args.capacity,
        sample_period: args.sample_period.map(SimTime),
        until: SimTime(args.until),
    };
    let model = build_ping_pong(&mut clock, &opts).map_err(|e| e.to_string())?;
    let run = clock.run_until(opts.until).map_err(|e| e.to_string())?;

    if let Some(path) = &args.trace_json {
        let json = serde_json::to_string_pretty(clock.trace().records())
            .map_err(|e| format!("serialize trace: {e}"))?;
        fs::write(path, json).map_err(|e| format!("write {}: {e}", path.display()))?;
        eprintln!("wrote trace records to {}", path.display());
    }

    let stats = model.stats.borrow();
    Ok(Report {
        run,
        exchanges_a: stats.exchanges_a,
        exchanges_b: stats.exchanges_b,
        last_value: stats.last_value,
        queue_len: model.chan.len(),
        queue_samples: stats.queue_samples.clone(),
        faults: clock.faults().len(),
    })
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let report = match run(&args) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("ping_pong failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "done @ {}, events={}, exchanges_a={}, exchanges_b={}, last_value={}",
        report.run.final_time,
        report.run.events_executed,
        report.exchanges_a,
        report.exchanges_b,
        report.last_value
    );

    if let Some(path) = &args.report_json {
        let json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("serialize report: {err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = fs::write(path, json) {
            eprintln!("write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
