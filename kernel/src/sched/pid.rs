//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! PID 定义
//!
//! - PID 0: swapper/idle 进程
//! - PID 1: init 进程
//! - PID 2+: 普通 PID

/// 进程标识符
pub type Pid = u32;

pub const PID_SWAPPER: Pid = 0;  // idle 进程
pub const PID_INIT: Pid = 1;     // init 进程

/// 列表输出中等待进程序列的结束标记
pub const PID_LIST_END: i32 = -1;
