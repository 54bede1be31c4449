//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 内核地址空间（Sv39）
//!
//! 启动核把设备寄存器和全部物理内存按恒等映射建进内核页表，
//! 之后每个 hart 各自把这张页表写进 satp 打开分页。

use core::sync::atomic::{AtomicUsize, Ordering};

use bitflags::bitflags;

use crate::boot::InitError;
use crate::config::{
    KERNBASE, PAGE_SHIFT, PAGE_SIZE, PHYS_MEMORY_END, PLIC_BASE, UART0_BASE, VIRTIO0_BASE,
};
use crate::mm::kalloc;

bitflags! {
    /// Sv39 页表项标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PteFlags: usize {
        const V = 1 << 0;
        const R = 1 << 1;
        const W = 1 << 2;
        const X = 1 << 3;
        const U = 1 << 4;
        const G = 1 << 5;
        const A = 1 << 6;
        const D = 1 << 7;
    }
}

extern "C" {
    static _text_end: u8;
}

/// 内核根页表的物理地址；init() 写入一次，之后只读
static KERNEL_PAGETABLE: AtomicUsize = AtomicUsize::new(0);

const PTE_PPN_SHIFT: usize = 10;
const PLIC_SIZE: usize = 0x40_0000;

fn pte_from(pa: usize, flags: PteFlags) -> usize {
    ((pa >> PAGE_SHIFT) << PTE_PPN_SHIFT) | flags.bits()
}

fn pte_to_pa(pte: usize) -> usize {
    (pte >> PTE_PPN_SHIFT) << PAGE_SHIFT
}

fn vpn(va: usize, level: usize) -> usize {
    (va >> (PAGE_SHIFT + 9 * level)) & 0x1ff
}

/// 查到（必要时创建）va 对应的叶子 PTE
unsafe fn walk(root: usize, va: usize) -> Result<*mut usize, InitError> {
    let mut table = root as *mut usize;
    for level in [2, 1] {
        let pte = table.add(vpn(va, level));
        if *pte & PteFlags::V.bits() != 0 {
            table = pte_to_pa(*pte) as *mut usize;
        } else {
            let page = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;
            *pte = pte_from(page as usize, PteFlags::V);
            table = page as *mut usize;
        }
    }
    Ok(table.add(vpn(va, 0)))
}

/// 把 [va, va+size) 逐页映射到 [pa, pa+size)，要求页对齐
fn map_pages(root: usize, va: usize, pa: usize, size: usize, flags: PteFlags) -> Result<(), InitError> {
    debug_assert_eq!(va % PAGE_SIZE, 0);
    debug_assert_eq!(pa % PAGE_SIZE, 0);

    let mut off = 0;
    while off < size {
        unsafe {
            let pte = walk(root, va + off)?;
            *pte = pte_from(pa + off, flags | PteFlags::V | PteFlags::A | PteFlags::D);
        }
        off += PAGE_SIZE;
    }
    Ok(())
}

/// 构建内核页表（全局一次）
pub fn init() -> Result<(), InitError> {
    let root = kalloc::alloc_page().ok_or(InitError::OutOfMemory)? as usize;

    // 设备寄存器
    map_pages(root, UART0_BASE, UART0_BASE, PAGE_SIZE, PteFlags::R | PteFlags::W)?;
    map_pages(root, VIRTIO0_BASE, VIRTIO0_BASE, PAGE_SIZE, PteFlags::R | PteFlags::W)?;
    map_pages(root, PLIC_BASE, PLIC_BASE, PLIC_SIZE, PteFlags::R | PteFlags::W)?;

    // 内核代码段：只读可执行。linker.ld 把 _text_end 对齐到页边界。
    let text_end = unsafe { &_text_end as *const u8 as usize };
    map_pages(root, KERNBASE, KERNBASE, text_end - KERNBASE, PteFlags::R | PteFlags::X)?;

    // 其余物理内存：内核数据段加上可分配页，可读写
    map_pages(
        root,
        text_end,
        text_end,
        PHYS_MEMORY_END - text_end,
        PteFlags::R | PteFlags::W,
    )?;

    KERNEL_PAGETABLE.store(root, Ordering::Release);
    log::info!("vm: kernel page table built, root = {:#x}", root);
    Ok(())
}

/// 打开当前 hart 的分页（每个 hart 各一次）
pub fn init_hart() -> Result<(), InitError> {
    let root = KERNEL_PAGETABLE.load(Ordering::Acquire);
    if root == 0 {
        return Err(InitError::Unready("kernel page table"));
    }
    unsafe {
        riscv::register::satp::set(riscv::register::satp::Mode::Sv39, 0, root >> PAGE_SHIFT);
        core::arch::asm!("sfence.vma zero, zero", options(nostack));
    }
    Ok(())
}
