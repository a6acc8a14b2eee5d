//! 信号量并发场景

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::harness::{setup, wait_until};
use crate::errno::Errno;
use crate::sync::SemInfo;

/// 场景 A：第二个等待者阻塞，直到 post 唤醒它
#[test]
fn test_blocked_waiter_resumed_by_post() {
    let (sched, sems) = setup();
    let id = sems.open("s", 1).unwrap();
    assert_eq!(id, 1);

    let first = Arc::clone(&sems);
    let (_, h1) = sched.spawn(move || first.wait(id));
    assert_eq!(h1.join().unwrap(), Ok(()));
    assert_eq!(sems.value(id), Ok(0));

    let second = Arc::clone(&sems);
    let (pid, h2) = sched.spawn(move || second.wait(id));
    wait_until("second waiter to block", || sched.is_blocked(pid));

    let mut info = [SemInfo::empty(); 1];
    assert_eq!(sems.list(&mut info), 1);
    assert_eq!(info[0].waiting_pids().collect::<Vec<_>>(), [pid]);

    sems.post(id).unwrap();
    assert_eq!(h2.join().unwrap(), Ok(()));
    assert_eq!(sems.value(id), Ok(0));

    assert_eq!(sems.list(&mut info), 1);
    assert_eq!(info[0].waiting_pids().count(), 0);
}

/// 每次 post 只唤醒一个等待者
#[test]
fn test_post_wakes_exactly_one() {
    let (sched, sems) = setup();
    let id = sems.open("gate", 0).unwrap();

    let mut handles = Vec::new();
    for _ in 0..2 {
        let sems = Arc::clone(&sems);
        handles.push(sched.spawn(move || sems.wait(id)));
    }
    wait_until("both waiters to block", || sched.blocked_count() == 2);

    sems.post(id).unwrap();
    wait_until("one waiter to finish", || handles.iter().any(|(_, h)| h.is_finished()));
    // 另一个仍然阻塞
    thread::sleep(Duration::from_millis(20));
    assert_eq!(handles.iter().filter(|(_, h)| h.is_finished()).count(), 1);
    assert_eq!(sched.blocked_count(), 1);
    assert_eq!(sems.value(id), Ok(0));

    sems.post(id).unwrap();
    for (_, h) in handles {
        assert_eq!(h.join().unwrap(), Ok(()));
    }
    assert_eq!(sems.value(id), Ok(0));
}

/// N 次 post、M 次 wait（M <= N）：所有 wait 都成功，最终值为 初始值 + N - M
#[test]
fn test_posts_and_waits_balance() {
    const INITIAL: u32 = 3;
    const WAITERS: usize = 4;
    const WAITS_EACH: usize = 50;
    const POSTERS: usize = 2;
    const POSTS_EACH: usize = 125;

    let (sched, sems) = setup();
    let id = sems.open("counter", INITIAL).unwrap();

    let mut handles = Vec::new();
    for _ in 0..WAITERS {
        let sems = Arc::clone(&sems);
        handles.push(sched.spawn(move || {
            for _ in 0..WAITS_EACH {
                sems.wait(id)?;
            }
            Ok::<(), Errno>(())
        }));
    }
    for _ in 0..POSTERS {
        let sems = Arc::clone(&sems);
        handles.push(sched.spawn(move || {
            for _ in 0..POSTS_EACH {
                sems.post(id)?;
                thread::yield_now();
            }
            Ok::<(), Errno>(())
        }));
    }

    for (_, h) in handles {
        assert_eq!(h.join().unwrap(), Ok(()));
    }

    let expected = INITIAL as usize + POSTERS * POSTS_EACH - WAITERS * WAITS_EACH;
    assert_eq!(sems.value(id), Ok(expected as u32));
    assert_eq!(sched.blocked_count(), 0);
}

fn slow_inc(global: &AtomicI64, inc: i64) {
    let aux = global.load(Ordering::Relaxed);
    thread::yield_now();
    global.store(aux + inc, Ordering::Relaxed);
}

/// 场景 B：信号量保护的读-改-写，最终结果确定为 0
#[test]
fn test_protected_increments_are_deterministic() {
    const PAIRS: usize = 2;
    const ROUNDS: usize = 300;

    for _ in 0..3 {
        let (sched, sems) = setup();
        let global = Arc::new(AtomicI64::new(0));

        let mut handles = Vec::new();
        for i in 0..(2 * PAIRS) {
            let inc = if i % 2 == 0 { 1 } else { -1 };
            let sems = Arc::clone(&sems);
            let global = Arc::clone(&global);
            handles.push(sched.spawn(move || {
                let id = sems.open("sem", 1)?;
                for _ in 0..ROUNDS {
                    sems.wait(id)?;
                    slow_inc(&global, inc);
                    sems.post(id)?;
                }
                sems.close(id)
            }));
        }

        for (_, h) in handles {
            assert_eq!(h.join().unwrap(), Ok(()));
        }
        assert_eq!(global.load(Ordering::Relaxed), 0);
        assert_eq!(sems.active_count(), 0);
    }
}

/// 仍有等待者时拒绝销毁
#[test]
fn test_close_refused_while_waiters_queued() {
    let (sched, sems) = setup();
    let id = sems.open("busy", 0).unwrap();

    let waiter = Arc::clone(&sems);
    let (pid, h) = sched.spawn(move || waiter.wait(id));
    wait_until("waiter to block", || sched.is_blocked(pid));

    assert_eq!(sems.close(id), Err(Errno::DeviceOrResourceBusy));
    assert_eq!(sems.active_count(), 1);

    sems.post(id).unwrap();
    assert_eq!(h.join().unwrap(), Ok(()));
    assert_eq!(sems.close(id), Ok(()));
    assert_eq!(sems.active_count(), 0);
}

/// 并发打开同一名称只创建一个信号量
#[test]
fn test_concurrent_open_creates_once() {
    let (sched, sems) = setup();

    let mut handles = Vec::new();
    for i in 0..8u32 {
        let sems = Arc::clone(&sems);
        handles.push(sched.spawn(move || sems.open("race", i + 1)));
    }
    let ids: Vec<_> = handles.into_iter().map(|(_, h)| h.join().unwrap().unwrap()).collect();
    assert!(ids.iter().all(|&id| id == ids[0]));
    assert_eq!(sems.active_count(), 1);

    let mut info = [SemInfo::empty(); 2];
    assert_eq!(sems.list(&mut info), 1);
    assert_eq!(info[0].links, 8);
    // 初始值来自最先完成创建的那个进程
    assert!((1..=8).contains(&info[0].value));
}
