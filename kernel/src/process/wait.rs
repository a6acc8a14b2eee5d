//! 等待队列 (Wait Queue) 机制
//!
//! 核心概念：
//! - 等待队列记录因某个条件不满足而阻塞的进程
//! - 进程需要等待时，把自己的 PID 加入队列，然后交给调度器阻塞
//! - 条件满足时，从队列中取出一个进程交给调度器唤醒（独占唤醒）
//!
//! 队列本身不做同步：调用者必须持有保护队列的对象锁。

use alloc::collections::VecDeque;

use crate::errno::Errno;
use crate::sched::Pid;

/// 创建队列时预留的容量
const WAIT_QUEUE_INITIAL_CAPACITY: usize = 4;

/// 阻塞进程队列能力
pub trait WaitQueue: Sized {
    /// 创建空队列，内存不足时失败
    fn try_new() -> Result<Self, Errno>;

    /// 加入一个等待进程
    fn add(&mut self, pid: Pid) -> Result<(), Errno>;

    /// 取出一个应被唤醒的进程（独占唤醒）
    ///
    /// 返回的进程已从队列中移除，由调用者交给调度器唤醒。
    fn wake_one(&mut self) -> Option<Pid>;

    /// 当前等待进程数量
    fn count(&self) -> usize;

    /// 按队列顺序把等待进程写入 `out`，返回写入数量
    fn pids(&self, out: &mut [Pid]) -> usize;

    /// 释放队列
    fn release(self) -> Result<(), Errno>;
}

/// 先进先出的等待队列
#[derive(Debug, Default)]
pub struct FifoWaitQueue {
    list: VecDeque<Pid>,
}

impl WaitQueue for FifoWaitQueue {
    fn try_new() -> Result<Self, Errno> {
        let mut list = VecDeque::new();
        list.try_reserve(WAIT_QUEUE_INITIAL_CAPACITY)
            .map_err(|_| Errno::OutOfMemory)?;
        Ok(Self { list })
    }

    fn add(&mut self, pid: Pid) -> Result<(), Errno> {
        self.list.try_reserve(1).map_err(|_| Errno::OutOfMemory)?;
        self.list.push_back(pid);
        Ok(())
    }

    fn wake_one(&mut self) -> Option<Pid> {
        self.list.pop_front()
    }

    fn count(&self) -> usize {
        self.list.len()
    }

    fn pids(&self, out: &mut [Pid]) -> usize {
        let mut n = 0;
        for (slot, pid) in out.iter_mut().zip(self.list.iter()) {
            *slot = *pid;
            n += 1;
        }
        n
    }

    fn release(self) -> Result<(), Errno> {
        // 仍有等待进程时释放会丢失它们
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(Errno::DeviceOrResourceBusy)
        }
    }
}
