//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 命名信号量表
//!
//! 核心概念：
//! - 固定大小的槽位数组，槽位下标就是信号量 ID，0 号槽位保留作无效 ID
//! - 全局锁保护：存活槽位位图、名称注册表、发布序号
//! - 对象锁保护：单个信号量的计数值、链接数、等待队列
//!
//! 加锁规则：
//! - 必须先取全局锁再取对象锁，不允许反向
//! - 任何时刻最多持有一个对象锁
//! - 调用调度器的 `block` / `yield_now` 之前必须释放所有锁
//!
//! 槽位中的对象先完整构造，最后才在位图中置位发布；
//! 通过全局锁看到的槽位要么完整可用，要么为空。

use core::array;

use log::{debug, trace, warn};
use spin::{Mutex, MutexGuard};

use crate::config::{MAX_SEMAPHORES, SEM_NAME_MAX, SEM_VALUE_MAX};
use crate::errno::Errno;
use crate::process::{FifoWaitQueue, WaitQueue};
use crate::sched::Scheduler;
use super::registry::{NameRegistry, NameTable};
use super::semaphore::{OpenFlags, SemInfo, Semaphore};
use super::{SemId, SEM_ID_NONE};

const SLOT_WORDS: usize = (MAX_SEMAPHORES + 63) / 64;

/// 存活槽位位图
struct SlotBitmap {
    words: [u64; SLOT_WORDS],
}

impl SlotBitmap {
    const fn new() -> Self {
        Self { words: [0; SLOT_WORDS] }
    }

    fn contains(&self, id: SemId) -> bool {
        id != SEM_ID_NONE && id < MAX_SEMAPHORES && self.words[id / 64] & (1 << (id % 64)) != 0
    }

    fn insert(&mut self, id: SemId) {
        self.words[id / 64] |= 1 << (id % 64);
    }

    fn remove(&mut self, id: SemId) {
        self.words[id / 64] &= !(1 << (id % 64));
    }

    /// 第一个空闲槽位（跳过 0 号）
    fn first_free(&self) -> Option<SemId> {
        (1..MAX_SEMAPHORES).find(|&id| !self.contains(id))
    }

    /// 按下标升序遍历存活槽位
    fn iter(&self) -> impl Iterator<Item = SemId> + '_ {
        (1..MAX_SEMAPHORES).filter(move |&id| self.contains(id))
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// 全局锁保护的表状态
struct SemTable<R> {
    live: SlotBitmap,
    registry: R,
    next_serial: u64,
}

type Slot<Q> = Mutex<Option<Semaphore<Q>>>;

/// 信号量管理器
///
/// 整个内核只应有一个实例（见 `crate::syscall`），启动时构造，
/// 之后不会整体销毁；单个信号量在最后一次 `close` 时销毁。
pub struct SemaphoreManager<S, R = NameTable, Q = FifoWaitQueue> {
    /// 全局锁
    table: Mutex<SemTable<R>>,
    /// 槽位数组，每个槽位自带对象锁
    slots: [Slot<Q>; MAX_SEMAPHORES],
    scheduler: S,
}

impl<S: Scheduler, R: NameRegistry, Q: WaitQueue> SemaphoreManager<S, R, Q> {
    /// 构造管理器
    ///
    /// 注册表创建失败时返回错误，子系统不可用。
    pub fn new(scheduler: S) -> Result<Self, Errno> {
        let registry = R::try_new().map_err(|e| {
            warn!("sem_init: failed to create name registry: {:?}", e);
            e
        })?;

        Ok(Self {
            table: Mutex::new(SemTable {
                live: SlotBitmap::new(),
                registry,
                next_serial: 0,
            }),
            slots: array::from_fn(|_| Mutex::new(None)),
            scheduler,
        })
    }

    /// 打开（必要时创建）命名信号量
    ///
    /// 名称已存在时共享同一个信号量，`initial` 被忽略。
    pub fn open(&self, name: &str, initial: u32) -> Result<SemId, Errno> {
        self.open_with_flags(name, initial, OpenFlags::CREATE)
    }

    /// 按标志打开命名信号量
    ///
    /// 整个过程持有全局锁，两个进程不会同时创建同名信号量或抢到同一个槽位。
    pub fn open_with_flags(&self, name: &str, initial: u32, flags: OpenFlags) -> Result<SemId, Errno> {
        if name.is_empty() {
            return Err(Errno::InvalidArgument);
        }
        if name.len() > SEM_NAME_MAX {
            return Err(Errno::FileNameTooLong);
        }

        let mut table = self.table.lock();

        if let Some(id) = table.registry.lookup(name) {
            if flags.contains(OpenFlags::CREATE | OpenFlags::EXCL) {
                return Err(Errno::FileExists);
            }
            let mut slot = self.slots[id].lock();
            let sem = slot.as_mut().ok_or(Errno::NoSuchFileOrDirectory)?;
            let links = sem.link()?;
            debug!("sem_open: '{}' shared as id {} ({} links)", name, id, links);
            return Ok(id);
        }

        if !flags.contains(OpenFlags::CREATE) {
            return Err(Errno::NoSuchFileOrDirectory);
        }
        if initial > SEM_VALUE_MAX {
            return Err(Errno::InvalidArgument);
        }

        let id = table.live.first_free().ok_or_else(|| {
            warn!("sem_open: semaphore table full ({} slots)", MAX_SEMAPHORES - 1);
            Errno::NoSpaceLeftOnDevice
        })?;

        let waiters = Q::try_new().map_err(|e| {
            warn!("sem_open: failed to create wait queue for '{}': {:?}", name, e);
            e
        })?;

        // 名称最后注册，失败时只需释放等待队列
        if let Err(e) = table.registry.register(id, name) {
            warn!("sem_open: failed to register '{}': {:?}", name, e);
            let _ = waiters.release();
            return Err(e);
        }

        table.next_serial += 1;
        let serial = table.next_serial;
        *self.slots[id].lock() = Some(Semaphore::new(initial, serial, waiters));
        table.live.insert(id);

        debug!("sem_open: created '{}' as id {} (value {})", name, id, initial);
        Ok(id)
    }

    /// 关闭一个链接
    ///
    /// 最后一个链接关闭时销毁信号量：注销名称、释放等待队列、清空槽位。
    /// 子资源释放失败时返回错误，但槽位仍然被清空，ID 不会泄漏。
    /// 仍有进程在等待队列中时拒绝销毁，返回 `EBUSY`。
    ///
    /// 只统计仍在队列中的进程：已被 `post` 取出、尚未重新取得对象锁的
    /// 等待者不计入。若它自己不持有链接，此时销毁会让那次 `post` 作废，
    /// 该等待者的 `wait` 返回 `ENOENT`。
    pub fn close(&self, id: SemId) -> Result<(), Errno> {
        let mut table = self.table.lock();
        if !table.live.contains(id) {
            return Err(Errno::NoSuchFileOrDirectory);
        }

        let mut slot = self.slots[id].lock();
        let sem = slot.as_mut().ok_or(Errno::NoSuchFileOrDirectory)?;

        if sem.links() > 1 {
            let links = sem.unlink();
            debug!("sem_close: id {} now has {} links", id, links);
            return Ok(());
        }

        if sem.waiter_count() > 0 {
            warn!(
                "sem_close: id {} still has {} waiters, refusing to destroy",
                id,
                sem.waiter_count()
            );
            return Err(Errno::DeviceOrResourceBusy);
        }

        let sem = slot.take().ok_or(Errno::NoSuchFileOrDirectory)?;
        table.live.remove(id);
        drop(slot);

        let mut failure = None;
        if let Err(e) = table.registry.unregister_id(id) {
            failure.get_or_insert(e);
        }
        if let Err(e) = sem.into_waiters().release() {
            failure.get_or_insert(e);
        }

        match failure {
            None => {
                debug!("sem_close: destroyed id {}", id);
                Ok(())
            }
            Some(e) => {
                warn!("sem_close: id {} destroyed with release failure: {:?}", id, e);
                Err(e)
            }
        }
    }

    /// 校验 ID 并取得对象锁
    ///
    /// 校验在全局锁下进行，对象锁取得后才释放全局锁；`close` 同样先取全局锁，
    /// 所以校验与销毁不会交错。
    fn lock_live(&self, id: SemId) -> Result<MutexGuard<'_, Option<Semaphore<Q>>>, Errno> {
        let table = self.table.lock();
        if !table.live.contains(id) {
            return Err(Errno::NoSuchFileOrDirectory);
        }
        let slot = self.slots[id].lock();
        drop(table);
        Ok(slot)
    }

    /// P 操作
    ///
    /// 计数值为 0 时把当前进程加入等待队列，释放对象锁后阻塞；被唤醒后重新
    /// 取得对象锁并重新检查条件。阻塞期间槽位被销毁或重用时返回 `ENOENT`。
    pub fn wait(&self, id: SemId) -> Result<(), Errno> {
        let pid = self.scheduler.current_pid();
        let mut slot = self.lock_live(id)?;
        let serial = slot.as_ref().map(|sem| sem.serial()).ok_or(Errno::NoSuchFileOrDirectory)?;

        loop {
            let sem = match slot.as_mut() {
                Some(sem) if sem.serial() == serial => sem,
                _ => return Err(Errno::NoSuchFileOrDirectory),
            };

            if sem.try_down() {
                return Ok(());
            }

            sem.enqueue(pid)?;
            drop(slot);

            trace!("sem_wait: pid {} blocks on id {}", pid, id);
            self.scheduler.block(pid);
            self.scheduler.yield_now();

            slot = self.slots[id].lock();
        }
    }

    /// V 操作
    ///
    /// 计数值加 1 并唤醒一个等待进程。计数值已达上限时返回 `EOVERFLOW`。
    pub fn post(&self, id: SemId) -> Result<(), Errno> {
        let mut slot = self.lock_live(id)?;
        let sem = slot.as_mut().ok_or(Errno::NoSuchFileOrDirectory)?;

        if let Some(pid) = sem.up()? {
            trace!("sem_post: id {} wakes pid {}", id, pid);
            self.scheduler.unblock(pid);
        }
        Ok(())
    }

    /// 读取当前计数值
    pub fn value(&self, id: SemId) -> Result<u32, Errno> {
        let slot = self.lock_live(id)?;
        slot.as_ref().map(|sem| sem.value()).ok_or(Errno::NoSuchFileOrDirectory)
    }

    /// 存活信号量数量
    pub fn active_count(&self) -> usize {
        self.table.lock().live.count()
    }

    /// 列出存活信号量，按 ID 升序，最多写满 `out`，返回写入数量
    ///
    /// 只在拷贝某一项时持有该项的对象锁：每一项自身一致，但整个列表不是
    /// 原子快照，拷贝期间其他信号量上的 wait/post 仍可进行。
    pub fn list(&self, out: &mut [SemInfo]) -> usize {
        let table = self.table.lock();
        let mut count = 0;

        for id in table.live.iter() {
            if count == out.len() {
                break;
            }
            let slot = self.slots[id].lock();
            if let Some(sem) = slot.as_ref() {
                sem.fill_info(id, table.registry.name_of(id), &mut out[count]);
                count += 1;
            }
        }

        count
    }
}
