//! log crate 对接
//!
//! 把 `log` 门面的记录写到内核控制台，级别来自内核配置。
//! 子系统里偏诊断性质的输出走 log::info!/warn!，
//! 启动里程碑仍然用 println! 直接打。

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::config::LOG_LEVEL;
use crate::println;

struct KernelLogger;

static LOGGER: KernelLogger = KernelLogger;

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        println!("[{}] {}: {}", tag, record.target(), record.args());
    }

    fn flush(&self) {}
}

/// 安装全局 logger（只在启动核调用一次，紧跟 print::init）
pub fn init() {
    let filter = match LOG_LEVEL {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(filter);
    }
}
