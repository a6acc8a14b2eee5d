//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 标准错误代码定义
//!
//! 和 include/uapi/asm-generic/errno.h 保持一致，只保留信号量子系统用到的部分

/// 标准错误代码
///
/// 使用方法：
/// ```rust
/// use ksem::errno::Errno;
///
/// fn lookup(id: usize) -> Result<(), Errno> {
///     if id == 0 {
///         return Err(Errno::NoSuchFileOrDirectory);
///     }
///     Ok(())
/// }
///
/// // 系统调用风格，返回负数
/// assert_eq!(Errno::NoSuchFileOrDirectory.as_neg_i64(), -2);
/// ```
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Errno {
    /// No such file or directory (ENOENT, 2)
    NoSuchFileOrDirectory = 2,

    /// I/O error (EIO, 5)
    IOError = 5,

    /// Out of memory (ENOMEM, 12)
    OutOfMemory = 12,

    /// Device or resource busy (EBUSY, 16)
    DeviceOrResourceBusy = 16,

    /// File exists (EEXIST, 17)
    FileExists = 17,

    /// Invalid argument (EINVAL, 22)
    InvalidArgument = 22,

    /// No space left on device (ENOSPC, 28)
    NoSpaceLeftOnDevice = 28,

    /// Too many links (EMLINK, 31)
    TooManyLinks = 31,

    /// File name too long (ENAMETOOLONG, 36)
    FileNameTooLong = 36,

    /// Function not implemented (ENOSYS, 38)
    FunctionNotImplemented = 38,

    /// Value too large (EOVERFLOW, 75)
    ValueTooLarge = 75,
}

impl Errno {
    /// 获取错误代码的正数值（用于比较）
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// 获取错误代码的负数值（用于系统调用返回）
    #[inline]
    pub const fn as_neg_i32(self) -> i32 {
        -(self as i32)
    }

    /// 获取错误代码的负数值（i64，用于系统调用返回）
    #[inline]
    pub const fn as_neg_i64(self) -> i64 {
        -(self as i32) as i64
    }
}

/// 常用的错误代码常量
pub mod constants {
    pub const ENOENT: i32 = 2;
    pub const EIO: i32 = 5;
    pub const ENOMEM: i32 = 12;
    pub const EBUSY: i32 = 16;
    pub const EEXIST: i32 = 17;
    pub const EINVAL: i32 = 22;
    pub const ENOSPC: i32 = 28;
    pub const EMLINK: i32 = 31;
    pub const ENAMETOOLONG: i32 = 36;
    pub const ENOSYS: i32 = 38;
    pub const EOVERFLOW: i32 = 75;
}
