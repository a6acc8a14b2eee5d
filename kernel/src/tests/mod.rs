//! 场景测试
//!
//! 使用 `harness::ThreadScheduler` 把宿主线程当作进程，验证真实并发下的
//! 阻塞与唤醒。运行测试：
//! ```bash
//! cargo test -p ksem
//! ```

mod harness;
mod semaphore;
