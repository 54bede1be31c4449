//! RISC-V S-mode 异常处理
//!
//! 全局部分只有时钟滴答计数；本核部分把 kernelvec 装进 stvec
//! 并打开中断使能位（sstatus.SIE 由调度器进入时才打开）。

use core::arch::asm;

use riscv::register::{sie, stvec};
use spin::Mutex;

use crate::config::{UART0_IRQ, VIRTIO0_IRQ};
use crate::drivers::plic;
use crate::println;

core::arch::global_asm!(include_str!("trap.S"));

extern "C" {
    fn kernelvec();
}

/// 时钟滴答计数（全局）
pub static TICKS: Mutex<u64> = Mutex::new(0);

/// trap 子系统全局初始化（只在启动核执行一次）
pub fn init() {
    *TICKS.lock() = 0;
}

/// 把内核异常向量装进当前 hart 的 stvec（每个 hart 各一次）
pub fn init_hart() {
    unsafe {
        // Direct 模式要求向量地址 4 字节对齐，trap.S 里有 .align 4
        stvec::write(kernelvec as usize, stvec::TrapMode::Direct);
        sie::set_sext();
        sie::set_ssoft();
        sie::set_stimer();
    }
}

// scause 的中断位和原因码
const SCAUSE_INTERRUPT: u64 = 1 << 63;
const IRQ_S_SOFT: u64 = 1;
const IRQ_S_TIMER: u64 = 5;
const IRQ_S_EXTERNAL: u64 = 9;

/// 内核态 trap 分发（从 trap.S 的 kernelvec 进来）
#[no_mangle]
pub extern "C" fn kerneltrap() {
    let (scause, sepc, stval): (u64, u64, u64);
    unsafe {
        asm!("csrr {}, scause", out(reg) scause, options(nomem, nostack));
        asm!("csrr {}, sepc", out(reg) sepc, options(nomem, nostack));
        asm!("csrr {}, stval", out(reg) stval, options(nomem, nostack));
    }

    if scause & SCAUSE_INTERRUPT != 0 {
        match scause & !SCAUSE_INTERRUPT {
            IRQ_S_EXTERNAL => {
                // PLIC 仲裁出的设备中断
                if let Some(irq) = plic::claim() {
                    match irq {
                        UART0_IRQ => crate::console::handle_interrupt(),
                        VIRTIO0_IRQ => crate::drivers::virtio_blk::handle_interrupt(),
                        _ => println!("trap: unexpected external irq {}", irq),
                    }
                    plic::complete(irq);
                }
            }
            IRQ_S_TIMER => {
                *TICKS.lock() += 1;
            }
            IRQ_S_SOFT => {
                // 核间软中断：目前没有用途
            }
            code => println!("trap: unhandled interrupt, scause code {}", code),
        }
    } else {
        panic!(
            "trap: exception scause={} sepc={:#x} stval={:#x}",
            scause, sepc, stval
        );
    }
}
