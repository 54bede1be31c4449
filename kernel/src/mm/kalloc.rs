//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 物理页帧分配器
//!
//! 空闲页用侵入式单链表串起来（链表节点就存在空闲页自己里面），
//! 链表头受自旋锁保护。管理范围是内核镜像末尾到物理内存上界。

use core::ptr;

use spin::Mutex;

use crate::boot::InitError;
use crate::config::{PAGE_SIZE, PHYS_MEMORY_END};

extern "C" {
    static _kernel_end: u8;
}

struct Run {
    next: *mut Run,
}

struct FreeList {
    head: *mut Run,
    npages: usize,
}

// 裸指针只在锁内解引用
unsafe impl Send for FreeList {}

static FREE_LIST: Mutex<FreeList> = Mutex::new(FreeList {
    head: ptr::null_mut(),
    npages: 0,
});

fn page_round_up(addr: usize) -> usize {
    (addr + PAGE_SIZE - 1) & !(PAGE_SIZE - 1)
}

/// 构建空闲页链表（全局一次，是所有内存初始化的前提）
pub fn init() -> Result<(), InitError> {
    let start = page_round_up(unsafe { &_kernel_end as *const u8 as usize });
    if start >= PHYS_MEMORY_END {
        return Err(InitError::OutOfMemory);
    }

    let mut list = FREE_LIST.lock();
    let mut pa = start;
    while pa + PAGE_SIZE <= PHYS_MEMORY_END {
        let run = pa as *mut Run;
        unsafe {
            (*run).next = list.head;
        }
        list.head = run;
        list.npages += 1;
        pa += PAGE_SIZE;
    }

    log::info!(
        "kalloc: {} free pages ({} MiB)",
        list.npages,
        list.npages * PAGE_SIZE / (1024 * 1024)
    );
    Ok(())
}

/// 分配一个清零的物理页
pub fn alloc_page() -> Option<*mut u8> {
    let mut list = FREE_LIST.lock();
    if list.head.is_null() {
        return None;
    }
    let run = list.head;
    unsafe {
        list.head = (*run).next;
    }
    list.npages -= 1;
    drop(list);

    let page = run as *mut u8;
    unsafe {
        ptr::write_bytes(page, 0, PAGE_SIZE);
    }
    Some(page)
}

/// 归还一个物理页
pub fn free_page(pa: *mut u8) {
    debug_assert_eq!(pa as usize % PAGE_SIZE, 0);
    let run = pa as *mut Run;
    let mut list = FREE_LIST.lock();
    unsafe {
        (*run).next = list.head;
    }
    list.head = run;
    list.npages += 1;
}

/// 当前空闲页数
pub fn free_pages() -> usize {
    FREE_LIST.lock().npages
}
