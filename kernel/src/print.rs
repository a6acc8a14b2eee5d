//! 控制台格式化输出
//!
//! `Console` 把格式化文本逐字节写到 `console` 注册的输出函数，换行前补 `\r`。
//! `logger` 的日志记录和 `print!` / `println!` 宏都经由这里输出。

use core::fmt;
use crate::console;

pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                console::putchar(b'\r');
            }
            console::putchar(b);
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ({
        use core::fmt::Write;
        let _ = write!(&mut $crate::print::Console, $($arg)*);
    });
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ({
        let mut _console = $crate::print::Console;
        let _ = ::core::fmt::Write::write_fmt(&mut _console, ::core::format_args!($($arg)*));
        let _ = ::core::fmt::Write::write_str(&mut _console, "\n");
    });
}
