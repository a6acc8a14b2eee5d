//! 控制台输出
//!
//! 子系统本身不绑定具体硬件：内核启动时通过 `set_output` 注册一个
//! 字节输出函数（UART、SBI 调用或测试用的缓冲区）。未注册时输出被丢弃。

use spin::Once;

static OUTPUT: Once<fn(u8)> = Once::new();

/// 注册控制台输出函数（只有第一次注册生效）
pub fn set_output(putc: fn(u8)) {
    OUTPUT.call_once(|| putc);
}

/// 控制台是否已经可用
pub fn is_ready() -> bool {
    OUTPUT.is_completed()
}

/// 写入单个字符
pub fn putchar(c: u8) {
    if let Some(putc) = OUTPUT.get() {
        putc(c);
    }
}
