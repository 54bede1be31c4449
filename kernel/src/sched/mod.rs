//! 调度器运行循环
//!
//! 启动编排在每个 hart 上的终点。多个 hart 并发进入是安全的：
//! 进程表槽位各自持锁，空闲 hart 用 wfi 等中断。

use crate::arch::cpu;
use crate::process;
use crate::println;

/// 每个 hart 的调度循环，永不返回
pub fn run() -> ! {
    let hart = crate::arch::cpu_id();
    println!("sched: hart {} entering scheduler", hart);

    // 本核硬件初始化已经全部完成，可以接中断了
    cpu::enable_irq();

    loop {
        match process::take_runnable() {
            Some(idx) => process::run_entry(idx),
            None => cpu::wfi(),
        }
    }
}
