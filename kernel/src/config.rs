//! ksem 内核配置（自动生成）
//!
//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 子系统名称
pub const KERNEL_NAME: &str = "ksem";

/// 子系统版本
pub const KERNEL_VERSION: &str = "0.1.0";

// ============================================================
// IPC 配置
// ============================================================

/// 信号量表大小（0 号槽位保留，不分配）
pub const MAX_SEMAPHORES: usize = 64;

/// 信号量名称最大长度（字节，不含结尾 NUL）
pub const SEM_NAME_MAX: usize = 31;

/// 信号量计数上限（包含）
pub const SEM_VALUE_MAX: u32 = 32767;

/// 列表操作中每个信号量最多报告的等待进程数
pub const SEM_MAX_WAITERS_LISTED: usize = 32;

// ============================================================
// 调试配置
// ============================================================

/// 默认日志级别
pub const LOG_LEVEL: &str = "info";
