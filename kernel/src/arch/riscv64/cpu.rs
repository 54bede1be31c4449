//! CPU 相关操作（RISC-V 64-bit）

use core::arch::asm;

/// 等待中断
#[inline]
pub fn wfi() {
    unsafe {
        asm!("wfi", options(nomem, nostack));
    }
}

/// 使能 S-mode 中断（sstatus.SIE）
#[inline]
pub fn enable_irq() {
    unsafe {
        riscv::register::sstatus::set_sie();
    }
}

/// 禁用 S-mode 中断
#[inline]
pub fn disable_irq() {
    unsafe {
        riscv::register::sstatus::clear_sie();
    }
}
