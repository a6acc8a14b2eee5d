//! ksem 构建脚本
//!
//! 这个脚本在编译前运行，负责：
//! 1. 解析 Kernel.toml 配置文件
//! 2. 生成 src/config.rs

use std::env;
use std::fs;
use std::path::PathBuf;

fn int_or(config: &toml::Value, section: &str, key: &str, default: i64) -> i64 {
    config.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(default)
}

fn str_or<'a>(config: &'a toml::Value, section: &str, key: &str, default: &'a str) -> &'a str {
    config.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or(default)
}

fn main() {
    println!("cargo:rerun-if-changed=../Kernel.toml");

    // 配置文件缺失时使用全部默认值
    let config: toml::Value = match fs::read_to_string("../Kernel.toml") {
        Ok(content) => toml::from_str(&content).expect("Kernel.toml 解析失败"),
        Err(_) => {
            println!("cargo:warning=Kernel.toml not found, using defaults");
            toml::Value::Table(toml::map::Map::new())
        }
    };

    generate_config_code(&config);
}

fn generate_config_code(config: &toml::Value) {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));

    let max_semaphores = int_or(config, "ipc", "max_semaphores", 64).max(2);
    let name_max = int_or(config, "ipc", "sem_name_max", 31).max(1);
    let value_max = int_or(config, "ipc", "sem_value_max", 32767).clamp(1, u32::MAX as i64);
    let waiters_listed = int_or(config, "ipc", "sem_max_waiters_listed", 32).max(0);

    let config_header = format!(
        r#"//! ksem 内核配置（自动生成）
//!
//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 子系统名称
pub const KERNEL_NAME: &str = "{}";

/// 子系统版本
pub const KERNEL_VERSION: &str = "{}";

// ============================================================
// IPC 配置
// ============================================================

/// 信号量表大小（0 号槽位保留，不分配）
pub const MAX_SEMAPHORES: usize = {};

/// 信号量名称最大长度（字节，不含结尾 NUL）
pub const SEM_NAME_MAX: usize = {};

/// 信号量计数上限（包含）
pub const SEM_VALUE_MAX: u32 = {};

/// 列表操作中每个信号量最多报告的等待进程数
pub const SEM_MAX_WAITERS_LISTED: usize = {};

// ============================================================
// 调试配置
// ============================================================

/// 默认日志级别
pub const LOG_LEVEL: &str = "{}";
"#,
        str_or(config, "general", "name", "ksem"),
        str_or(config, "general", "version", "0.1.0"),
        max_semaphores,
        name_max,
        value_max,
        waiters_listed,
        str_or(config, "debug", "log_level", "info"),
    );

    let config_file = manifest_dir.join("src").join("config.rs");

    // 只有内容变化时才写入，避免每次编译都更新文件时间戳
    let existing_content = fs::read_to_string(&config_file).unwrap_or_default();
    if existing_content != config_header {
        fs::write(&config_file, &config_header).expect("写入配置文件失败");
    }
}
