//! 命名资源注册表
//!
//! 维护 名称 -> 信号量 ID 的映射，同一名称同时最多对应一个存活的 ID。
//! 注册表不做同步，由信号量表的全局锁保护。

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::config::SEM_NAME_MAX;
use crate::errno::Errno;
use super::SemId;

/// 名称到 ID 的映射能力
pub trait NameRegistry: Sized {
    /// 创建空注册表
    fn try_new() -> Result<Self, Errno>;

    /// 按名称查找
    fn lookup(&self, name: &str) -> Option<SemId>;

    /// 注册名称；名称已被占用时失败
    fn register(&mut self, id: SemId, name: &str) -> Result<(), Errno>;

    /// 注销名称，返回原来对应的 ID
    fn unregister(&mut self, name: &str) -> Result<SemId, Errno>;

    /// 反向查找 ID 对应的名称
    fn name_of(&self, id: SemId) -> Option<&str>;

    /// 按 ID 注销名称
    ///
    /// 名称先拷贝到栈上的缓冲区，销毁路径上不需要分配内存。
    fn unregister_id(&mut self, id: SemId) -> Result<(), Errno> {
        let mut buf = [0u8; SEM_NAME_MAX];
        let len = {
            let name = self.name_of(id).ok_or(Errno::NoSuchFileOrDirectory)?;
            if name.len() > SEM_NAME_MAX {
                return Err(Errno::FileNameTooLong);
            }
            buf[..name.len()].copy_from_slice(name.as_bytes());
            name.len()
        };
        let name = core::str::from_utf8(&buf[..len]).map_err(|_| Errno::InvalidArgument)?;
        self.unregister(name).map(|_| ())
    }
}

/// 基于有序映射的注册表
///
/// 正反两个方向各维护一份映射，`name_of` 与 `lookup` 都是对数时间。
#[derive(Debug, Default)]
pub struct NameTable {
    names: BTreeMap<String, SemId>,
    ids: BTreeMap<SemId, String>,
}

impl NameTable {
    /// 已注册的名称数量
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn try_copy(name: &str) -> Result<String, Errno> {
    let mut owned = String::new();
    owned.try_reserve_exact(name.len()).map_err(|_| Errno::OutOfMemory)?;
    owned.push_str(name);
    Ok(owned)
}

impl NameRegistry for NameTable {
    fn try_new() -> Result<Self, Errno> {
        Ok(Self {
            names: BTreeMap::new(),
            ids: BTreeMap::new(),
        })
    }

    fn lookup(&self, name: &str) -> Option<SemId> {
        self.names.get(name).copied()
    }

    fn register(&mut self, id: SemId, name: &str) -> Result<(), Errno> {
        if self.names.contains_key(name) {
            return Err(Errno::FileExists);
        }

        // 名称拷贝走可失败的分配路径
        let key = try_copy(name)?;
        let rev = try_copy(name)?;

        self.names.insert(key, id);
        self.ids.insert(id, rev);
        Ok(())
    }

    fn unregister(&mut self, name: &str) -> Result<SemId, Errno> {
        let id = self.names.remove(name).ok_or(Errno::NoSuchFileOrDirectory)?;
        self.ids.remove(&id);
        Ok(id)
    }

    fn name_of(&self, id: SemId) -> Option<&str> {
        self.ids.get(&id).map(String::as_str)
    }
}
