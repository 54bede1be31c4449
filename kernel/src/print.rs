//! 格式化输出
//!
//! 输出子系统两段初始化的第二段：print::init() 打开输出互斥锁。
//! 在那之前（单核早期启动阶段）直接写 UART，不加锁。

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use spin::Mutex;

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

/// 输出锁：防止多个 hart 的整行输出互相穿插
static PRINT_LOCK: Mutex<()> = Mutex::new(());
static LOCKING: AtomicBool = AtomicBool::new(false);

/// 格式化输出初始化（只在启动核执行一次）
pub fn init() {
    LOCKING.store(true, Ordering::Release);
}

pub fn write_fmt(args: fmt::Arguments) {
    use fmt::Write;
    if LOCKING.load(Ordering::Acquire) {
        let _guard = PRINT_LOCK.lock();
        let _ = Console.write_fmt(args);
    } else {
        let _ = Console.write_fmt(args);
    }
}

/// 整行输出：内容和换行在同一把锁里写完
pub fn write_line(args: fmt::Arguments) {
    use fmt::Write;
    if LOCKING.load(Ordering::Acquire) {
        let _guard = PRINT_LOCK.lock();
        let _ = Console.write_fmt(args);
        let _ = Console.write_str("\n");
    } else {
        let _ = Console.write_fmt(args);
        let _ = Console.write_str("\n");
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ({
        $crate::print::write_fmt(::core::format_args!($($arg)*));
    });
}

#[macro_export]
macro_rules! println {
    () => ($crate::print::write_line(::core::format_args!("")));
    ($($arg:tt)*) => ({
        $crate::print::write_line(::core::format_args!($($arg)*));
    });
}
