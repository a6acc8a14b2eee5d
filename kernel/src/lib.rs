//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! ksem: 内核命名计数信号量子系统
//!
//! 进程按名称打开信号量，通过 wait/post 互相阻塞和唤醒，用完后关闭。
//! 内核链接本库后：
//! 1. `console::set_output()` 注册控制台输出
//! 2. `logger::init()` 安装日志器
//! 3. `syscall::sem_init()` 传入调度器，构造全局信号量表
//!
//! 调度器、等待队列、名称注册表都通过 trait 接入，核心逻辑只依赖它们的行为。

#![cfg_attr(not(test), no_std)]

extern crate alloc;
extern crate log;

pub mod config;
pub mod console;
pub mod errno;
pub mod logger;
pub mod print;
pub mod process;
pub mod sched;
pub mod sync;
pub mod syscall;

#[cfg(test)]
mod tests;
