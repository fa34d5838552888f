mod activity;
mod config_trace;
mod process;
