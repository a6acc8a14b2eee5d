//! 进程相关的等待机制

pub mod wait;

pub use wait::{FifoWaitQueue, WaitQueue};
