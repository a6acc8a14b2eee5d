//! 同步原语 (Synchronization Primitives)
//!
//! 命名计数信号量：
//! - `open`: 按名称打开（必要时创建），同名共享同一个信号量
//! - `wait` (P 操作): 计数值为 0 时阻塞
//! - `post` (V 操作): 计数值加 1，唤醒一个等待进程
//! - `close`: 关闭链接，最后一个链接关闭时销毁

pub mod registry;
pub mod semaphore;
pub mod table;

/// 信号量 ID，即槽位下标
pub type SemId = usize;

/// 无效 ID
pub const SEM_ID_NONE: SemId = 0;

pub use registry::{NameRegistry, NameTable};
pub use semaphore::{OpenFlags, SemInfo, Semaphore};
pub use table::SemaphoreManager;
