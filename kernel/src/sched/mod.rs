//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! 调度器接口
//!
//! 信号量子系统只依赖调度器的四个能力：
//! - `current_pid()`: 当前运行进程
//! - `block(pid)`: 把进程标记为阻塞（不会挂起调用者）
//! - `unblock(pid)`: 把阻塞的进程放回就绪状态
//! - `yield_now()`: 让出 CPU；若当前进程被标记为阻塞，直到被唤醒才返回
//!
//! 调用 `yield_now()` 时绝不能持有任何自旋锁。

pub mod pid;

pub use pid::{Pid, PID_INIT, PID_LIST_END, PID_SWAPPER};

/// 调度器能力
///
/// # 唤醒约定
///
/// `unblock(pid)` 可能发生在目标进程调用 `block(pid)` 之前（进程已入等待
/// 队列、已释放对象锁，但尚未标记阻塞）。实现必须记住这次唤醒，使随后的
/// `block(pid)` 立即失效，否则唤醒会丢失。
pub trait Scheduler: Sync {
    /// 当前运行进程的 PID
    fn current_pid(&self) -> Pid;

    /// 标记进程为阻塞
    fn block(&self, pid: Pid);

    /// 唤醒进程
    fn unblock(&self, pid: Pid);

    /// 让出 CPU
    fn yield_now(&self);
}

impl<T: Scheduler + ?Sized> Scheduler for &T {
    fn current_pid(&self) -> Pid {
        (**self).current_pid()
    }

    fn block(&self, pid: Pid) {
        (**self).block(pid)
    }

    fn unblock(&self, pid: Pid) {
        (**self).unblock(pid)
    }

    fn yield_now(&self) {
        (**self).yield_now()
    }
}
