#![no_std]
#![no_main]

extern crate alloc;
extern crate log;

use core::panic::PanicInfo;

mod arch;
mod boot;
mod config;
mod console;
mod drivers;
mod fs;
mod logger;
mod mm;
mod print;
mod process;
mod sched;
mod sync;

#[cfg(feature = "unit-test")]
mod tests;

/// 每个 hart 的 Rust 入口
///
/// boot.S 已经把 hartid 放进 tp、切换到本 hart 的启动栈并清零 .bss，
/// 之后所有 hart 都从这里进入启动编排，一去不返。
#[no_mangle]
pub extern "C" fn rust_main() -> ! {
    let hartid = arch::cpu_id();

    // 第一个进入内核的 hart 负责通过 SBI 唤醒其余 hart，
    // 被唤醒的 hart 走完全相同的入口
    arch::smp::start_other_harts(hartid);

    boot::main(hartid)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    println!("kernel panic: {}", info);
    boot::halt()
}
