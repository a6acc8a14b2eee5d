//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 信号量系统调用入口
//!
//! 全局只有一个信号量管理器，由 `sem_init` 在启动时构造，之后不会销毁。
//! 所有入口返回 i64：成功时为非负结果，失败时为负的错误码。

use log::info;
use spin::Once;

use crate::config::{KERNEL_NAME, KERNEL_VERSION, MAX_SEMAPHORES};
use crate::errno::Errno;
use crate::sched::Scheduler;
use crate::sync::{OpenFlags, SemId, SemInfo, SemaphoreManager};

type KernelSemaphores = SemaphoreManager<&'static dyn Scheduler>;

static SEMAPHORES: Once<KernelSemaphores> = Once::new();

/// 初始化信号量子系统
///
/// 必须在第一次系统调用之前调用；重复调用不会重建信号量表。
pub fn sem_init(scheduler: &'static dyn Scheduler) -> Result<(), Errno> {
    SEMAPHORES.try_call_once(|| SemaphoreManager::new(scheduler))?;
    info!(
        "{} v{}: semaphore table ready ({} slots)",
        KERNEL_NAME,
        KERNEL_VERSION,
        MAX_SEMAPHORES - 1
    );
    Ok(())
}

fn semaphores() -> Result<&'static KernelSemaphores, Errno> {
    SEMAPHORES.get().ok_or(Errno::FunctionNotImplemented)
}

fn to_ret(result: Result<i64, Errno>) -> i64 {
    match result {
        Ok(v) => v,
        Err(e) => e.as_neg_i64(),
    }
}

/// sem_open：返回信号量 ID
pub fn sys_sem_open(name: &str, initial: u32) -> i64 {
    to_ret(semaphores().and_then(|s| s.open(name, initial)).map(|id| id as i64))
}

/// sem_open（带 O_CREAT / O_EXCL 标志）
pub fn sys_sem_open_flags(name: &str, initial: u32, flags: u32) -> i64 {
    let flags = match OpenFlags::from_bits(flags) {
        Some(f) => f,
        None => return Errno::InvalidArgument.as_neg_i64(),
    };
    to_ret(
        semaphores()
            .and_then(|s| s.open_with_flags(name, initial, flags))
            .map(|id| id as i64),
    )
}

/// sem_wait：可能阻塞
pub fn sys_sem_wait(id: SemId) -> i64 {
    to_ret(semaphores().and_then(|s| s.wait(id)).map(|_| 0))
}

/// sem_post
pub fn sys_sem_post(id: SemId) -> i64 {
    to_ret(semaphores().and_then(|s| s.post(id)).map(|_| 0))
}

/// sem_close
pub fn sys_sem_close(id: SemId) -> i64 {
    to_ret(semaphores().and_then(|s| s.close(id)).map(|_| 0))
}

/// sem_getvalue
pub fn sys_sem_getvalue(id: SemId) -> i64 {
    to_ret(semaphores().and_then(|s| s.value(id)).map(i64::from))
}

/// 列出信号量：返回写入 `out` 的记录数
pub fn sys_sem_list(out: &mut [SemInfo]) -> i64 {
    to_ret(semaphores().map(|s| s.list(out) as i64))
}
