//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! RISC-V PLIC 驱动（QEMU virt 平台）
//!
//! 全局部分设置中断源优先级；本核部分打开本 hart 的使能位
//! 并把阈值清零。S-mode context 的寄存器布局来自 QEMU virt
//! 的 PLIC 映射。

use core::ptr::{read_volatile, write_volatile};

use crate::config::{MAX_CPUS, PLIC_BASE, UART0_IRQ, VIRTIO0_IRQ};
use crate::println;

// 各寄存器组相对 PLIC_BASE 的偏移
const PRIORITY_BASE: usize = 0x0000;
// hart 0 的 S-mode 使能位，每个 hart 间隔 0x100
const SENABLE_BASE: usize = 0x2080;
const SENABLE_STRIDE: usize = 0x100;
// hart 0 的 S-mode 阈值/claim，每个 hart 间隔 0x2000
const SCONTEXT_BASE: usize = 0x20_1000;
const SCONTEXT_STRIDE: usize = 0x2000;

fn write_reg(off: usize, v: u32) {
    unsafe { write_volatile((PLIC_BASE + off) as *mut u32, v) }
}

fn read_reg(off: usize) -> u32 {
    unsafe { read_volatile((PLIC_BASE + off) as *const u32) }
}

/// 全局初始化：给要用的中断源设优先级（全局一次）
pub fn init() {
    write_reg(PRIORITY_BASE + UART0_IRQ * 4, 1);
    write_reg(PRIORITY_BASE + VIRTIO0_IRQ * 4, 1);
    println!(
        "plic: irq priorities set (uart={}, virtio={})",
        UART0_IRQ, VIRTIO0_IRQ
    );
}

/// 本核初始化：使能中断源并清零阈值（每个 hart 各一次）
pub fn init_hart(hart: usize) {
    debug_assert!(hart < MAX_CPUS);

    // UART 和 virtio 的中断号都落在第一个使能字里
    let enable = SENABLE_BASE + hart * SENABLE_STRIDE;
    write_reg(enable, (1 << UART0_IRQ) | (1 << VIRTIO0_IRQ));

    // 阈值 0：任何优先级 > 0 的中断都放行
    write_reg(SCONTEXT_BASE + hart * SCONTEXT_STRIDE, 0);
}

/// 认领当前 hart 的一个待处理中断
pub fn claim() -> Option<usize> {
    let hart = crate::arch::cpu_id();
    let irq = read_reg(SCONTEXT_BASE + hart * SCONTEXT_STRIDE + 4);
    if irq == 0 {
        None
    } else {
        Some(irq as usize)
    }
}

/// 通知 PLIC 中断处理完毕
pub fn complete(irq: usize) {
    let hart = crate::arch::cpu_id();
    write_reg(SCONTEXT_BASE + hart * SCONTEXT_STRIDE + 4, irq as u32);
}
