//! 线程调度器
//!
//! 每个测试线程对应一个 PID；`block` 只做标记，`yield_now` 在被标记为阻塞
//! 时挂起线程直到 `unblock`。`unblock` 早于 `block` 到达时记为待处理唤醒。

use std::cell::Cell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::sched::{Pid, Scheduler, PID_INIT, PID_SWAPPER};
use crate::sync::SemaphoreManager;

thread_local! {
    static CURRENT: Cell<Pid> = Cell::new(PID_SWAPPER);
}

#[derive(Default)]
struct RunState {
    blocked: HashSet<Pid>,
    pending_wakeups: HashSet<Pid>,
}

pub struct ThreadScheduler {
    state: Mutex<RunState>,
    wakeup: Condvar,
    next_pid: AtomicU32,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunState::default()),
            wakeup: Condvar::new(),
            next_pid: AtomicU32::new(PID_INIT + 1),
        }
    }

    /// 以新 PID 启动一个线程
    pub fn spawn<F, T>(&self, f: F) -> (Pid, JoinHandle<T>)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        let handle = thread::spawn(move || {
            CURRENT.with(|c| c.set(pid));
            f()
        });
        (pid, handle)
    }

    pub fn is_blocked(&self, pid: Pid) -> bool {
        self.state.lock().unwrap().blocked.contains(&pid)
    }

    pub fn blocked_count(&self) -> usize {
        self.state.lock().unwrap().blocked.len()
    }
}

impl Scheduler for ThreadScheduler {
    fn current_pid(&self) -> Pid {
        CURRENT.with(|c| c.get())
    }

    fn block(&self, pid: Pid) {
        let mut state = self.state.lock().unwrap();
        if !state.pending_wakeups.remove(&pid) {
            state.blocked.insert(pid);
        }
    }

    fn unblock(&self, pid: Pid) {
        let mut state = self.state.lock().unwrap();
        if !state.blocked.remove(&pid) {
            state.pending_wakeups.insert(pid);
        }
        self.wakeup.notify_all();
    }

    fn yield_now(&self) {
        let pid = self.current_pid();
        let mut state = self.state.lock().unwrap();
        while state.blocked.contains(&pid) {
            state = self.wakeup.wait(state).unwrap();
        }
        drop(state);
        thread::yield_now();
    }
}

pub type TestSemaphores = SemaphoreManager<&'static ThreadScheduler>;

/// 每个测试独立的调度器和信号量表
pub fn setup() -> (&'static ThreadScheduler, Arc<TestSemaphores>) {
    let sched: &'static ThreadScheduler = Box::leak(Box::new(ThreadScheduler::new()));
    let sems = SemaphoreManager::new(sched).unwrap();
    (sched, Arc::new(sems))
}

/// 轮询等待条件成立，超时则失败
pub fn wait_until<F: Fn() -> bool>(what: &str, cond: F) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(1));
    }
}
