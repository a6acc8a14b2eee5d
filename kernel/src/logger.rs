//! 内核日志
//!
//! 子系统内部统一使用 `log` 宏（`debug!`、`warn!` 等），这里提供把日志
//! 记录写到控制台的 `log::Log` 实现。

use core::fmt::{self, Write};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::config;
use crate::console;
use crate::print::Console;

/// 控制台日志器
pub struct KernelLogger;

static LOGGER: KernelLogger = KernelLogger;

impl KernelLogger {
    /// 按 `[LEVEL] target: message` 格式写出一条记录
    pub fn write_record<W: Write>(out: &mut W, level: Level, target: &str, args: fmt::Arguments<'_>) -> fmt::Result {
        writeln!(out, "[{:<5}] {}: {}", level, target, args)
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        console::is_ready() && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = Self::write_record(&mut Console, record.level(), record.target(), *record.args());
    }

    fn flush(&self) {}
}

/// 解析配置中的日志级别
pub fn parse_level(level: &str) -> LevelFilter {
    match level {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// 安装控制台日志器
///
/// 重复调用是无害的：`log` 只接受第一次安装，后续调用只更新级别。
pub fn init() {
    let level = if cfg!(feature = "debug_log") {
        LevelFilter::Trace
    } else {
        parse_level(config::LOG_LEVEL)
    };
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
