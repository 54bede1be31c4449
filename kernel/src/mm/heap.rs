//! 内核堆分配器
//!
//! `alloc` 里的 Box/Vec 都走这里。堆区是一段静态数组，
//! 交给 linked_list_allocator 管理。

use linked_list_allocator::LockedHeap;

use crate::boot::InitError;
use crate::config::KERNEL_HEAP_SIZE;

#[global_allocator]
static HEAP_ALLOCATOR: LockedHeap = LockedHeap::empty();

static mut HEAP_SPACE: [u8; KERNEL_HEAP_SIZE] = [0; KERNEL_HEAP_SIZE];

/// 初始化内核堆（全局一次）
pub fn init() -> Result<(), InitError> {
    unsafe {
        HEAP_ALLOCATOR
            .lock()
            .init(core::ptr::addr_of_mut!(HEAP_SPACE) as *mut u8, KERNEL_HEAP_SIZE);
    }
    log::info!("heap: {} KiB kernel heap ready", KERNEL_HEAP_SIZE / 1024);
    Ok(())
}
