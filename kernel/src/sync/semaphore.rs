//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 命名信号量对象
//!
//! 核心概念：
//! - 计数值：非负，上限为 `SEM_VALUE_MAX`
//! - 链接数：打开该信号量的句柄数量，降为 0 时对象被销毁
//! - 等待队列：因计数值为 0 而阻塞的进程
//!
//! 对象的所有字段都由所在槽位的对象锁保护，本模块不做同步。

use bitflags::bitflags;

use crate::config::{SEM_MAX_WAITERS_LISTED, SEM_NAME_MAX, SEM_VALUE_MAX};
use crate::errno::Errno;
use crate::process::WaitQueue;
use crate::sched::{Pid, PID_LIST_END};
use super::SemId;

bitflags! {
    /// sem_open 标志，取值与 O_CREAT / O_EXCL 相同
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// 名称不存在时创建
        const CREATE = 0o100;
        /// 与 CREATE 一起使用：名称已存在时失败
        const EXCL   = 0o200;
    }
}

/// 信号量对象
pub struct Semaphore<Q> {
    /// 计数值
    value: u32,
    /// 链接数（打开的句柄数量）
    links: u32,
    /// 发布序号，用于识别槽位被重用
    serial: u64,
    /// 等待队列
    waiters: Q,
}

impl<Q: WaitQueue> Semaphore<Q> {
    /// 创建信号量，链接数为 1
    pub fn new(value: u32, serial: u64, waiters: Q) -> Self {
        Self {
            value,
            links: 1,
            serial,
            waiters,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn links(&self) -> u32 {
        self.links
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.count()
    }

    /// P 操作的非阻塞部分：计数值为正时减 1
    pub fn try_down(&mut self) -> bool {
        if self.value > 0 {
            self.value -= 1;
            true
        } else {
            false
        }
    }

    /// V 操作：计数值加 1，并取出一个需要唤醒的等待进程
    ///
    /// 达到上限时拒绝，不修改计数值也不唤醒任何进程。
    pub fn up(&mut self) -> Result<Option<Pid>, Errno> {
        if self.value >= SEM_VALUE_MAX {
            return Err(Errno::ValueTooLarge);
        }
        self.value += 1;
        Ok(self.waiters.wake_one())
    }

    /// 把进程加入等待队列
    pub fn enqueue(&mut self, pid: Pid) -> Result<(), Errno> {
        self.waiters.add(pid)
    }

    /// 增加一个链接
    pub fn link(&mut self) -> Result<u32, Errno> {
        self.links = self.links.checked_add(1).ok_or(Errno::TooManyLinks)?;
        Ok(self.links)
    }

    /// 减少一个链接，返回剩余链接数
    ///
    /// 最后一个链接不能通过这里释放，应走销毁路径。
    pub fn unlink(&mut self) -> u32 {
        if self.links > 1 {
            self.links -= 1;
        }
        self.links
    }

    /// 拆出等待队列以便释放
    pub fn into_waiters(self) -> Q {
        self.waiters
    }

    /// 填充列表记录
    pub fn fill_info(&self, id: SemId, name: Option<&str>, info: &mut SemInfo) {
        info.id = id as u32;
        info.value = self.value;
        info.links = self.links;
        info.set_name(name.unwrap_or(""));

        let mut pids = [0 as Pid; SEM_MAX_WAITERS_LISTED];
        let n = self.waiters.pids(&mut pids);
        // 记录中的 PID 是 i32，放不下的 PID 不列出，避免与结束标记混淆
        let mut listed = 0;
        for pid in pids[..n].iter().filter_map(|&pid| i32::try_from(pid).ok()) {
            info.waiting[listed] = pid;
            listed += 1;
        }
        info.waiting[listed] = PID_LIST_END;
    }
}

/// 信号量列表记录
///
/// 布局固定，可以直接拷贝到用户空间：
/// - `name` 以 NUL 结尾，匿名时为空串
/// - `waiting` 以 `PID_LIST_END` (-1) 结尾
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SemInfo {
    pub id: u32,
    pub value: u32,
    pub links: u32,
    pub name: [u8; SEM_NAME_MAX + 1],
    pub waiting: [i32; SEM_MAX_WAITERS_LISTED + 1],
}

impl SemInfo {
    pub const fn empty() -> Self {
        Self {
            id: 0,
            value: 0,
            links: 0,
            name: [0; SEM_NAME_MAX + 1],
            waiting: [PID_LIST_END; SEM_MAX_WAITERS_LISTED + 1],
        }
    }

    fn set_name(&mut self, name: &str) {
        let len = name.len().min(SEM_NAME_MAX);
        self.name = [0; SEM_NAME_MAX + 1];
        self.name[..len].copy_from_slice(&name.as_bytes()[..len]);
    }

    /// 名称（到第一个 NUL 为止）
    pub fn name(&self) -> &str {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        core::str::from_utf8(&self.name[..len]).unwrap_or("")
    }

    /// 等待进程（到结束标记为止）
    pub fn waiting_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.waiting
            .iter()
            .take_while(|&&pid| pid != PID_LIST_END)
            .map(|&pid| pid as Pid)
    }
}

impl Default for SemInfo {
    fn default() -> Self {
        Self::empty()
    }
}
