// 测试：内核堆分配器与物理页分配器
use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::mm::kalloc;
use crate::println;

pub fn test_heap() {
    println!("test: Testing kernel heap...");

    // 测试 1: Box 分配与读回
    println!("test: 1. Box allocation...");
    let boxed = Box::new(0xdead_beef_u64);
    if *boxed == 0xdead_beef_u64 {
        println!("test:    SUCCESS - Box value intact");
    } else {
        println!("test:    FAILED - Box value corrupted");
        return;
    }

    // 测试 2: Vec 增长跨越多次重分配
    println!("test: 2. Vec growth...");
    let mut v = Vec::new();
    for i in 0..1024u32 {
        v.push(i);
    }
    if v.len() == 1024 && v[0] == 0 && v[1023] == 1023 {
        println!("test:    SUCCESS - Vec of 1024 elements");
    } else {
        println!("test:    FAILED - Vec contents wrong");
        return;
    }

    // 测试 3: 释放后可以再次分配
    println!("test: 3. Reallocation after drop...");
    drop(v);
    drop(boxed);
    let again = Box::new([0u8; 4096]);
    if again.iter().all(|&b| b == 0) {
        println!("test:    SUCCESS - reallocation works");
    } else {
        println!("test:    FAILED - reallocation returned garbage");
    }

    println!("test: heap testing completed.");
}

pub fn test_kalloc() {
    println!("test: Testing page allocator...");

    // 测试 1: 分配的页已清零，归还后空闲页数不变
    println!("test: 1. Page alloc/free...");
    let free_before = kalloc::free_pages();
    match kalloc::alloc_page() {
        Some(page) => {
            let zeroed = unsafe {
                core::slice::from_raw_parts(page, crate::config::PAGE_SIZE)
                    .iter()
                    .all(|&b| b == 0)
            };
            if !zeroed {
                println!("test:    FAILED - allocated page not zeroed");
                return;
            }
            kalloc::free_page(page);
            if kalloc::free_pages() == free_before {
                println!("test:    SUCCESS - page zeroed, free count restored");
            } else {
                println!("test:    FAILED - free page count drifted");
            }
        }
        None => println!("test:    FAILED - allocator empty right after boot"),
    }

    println!("test: page allocator testing completed.");
}
