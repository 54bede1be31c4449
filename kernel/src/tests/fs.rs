// 测试：块缓存、inode 表、打开文件表
use crate::fs::{bio, file, inode};
use crate::fs::file::FileType;
use crate::config::BSIZE;
use crate::println;

// 测试用的临时块，避开块 0（引导区）
const SCRATCH_BLOCK: u64 = 1;

pub fn test_fs() {
    println!("test: Testing fs tables...");

    // 测试 1: 块写穿后读回同样内容
    println!("test: 1. Block write/read roundtrip...");
    let mut data = [0u8; BSIZE];
    for (i, b) in data.iter_mut().enumerate() {
        *b = (i % 251) as u8;
    }
    if let Err(err) = bio::write(SCRATCH_BLOCK, &data) {
        println!("test:    FAILED - write error: {}", err);
        return;
    }
    let mut back = [0u8; BSIZE];
    match bio::read(SCRATCH_BLOCK, &mut back) {
        Ok(()) if back == data => println!("test:    SUCCESS - block contents match"),
        Ok(()) => {
            println!("test:    FAILED - block contents differ");
            return;
        }
        Err(err) => {
            println!("test:    FAILED - read error: {}", err);
            return;
        }
    }

    // 测试 2: 同一 (dev, inum) 复用同一槽位，引用归零后表回到空
    println!("test: 2. Inode table sharing and release...");
    let before = inode::active_count();
    let a = inode::iget(1, 7);
    let b = inode::iget(1, 7);
    match (a, b) {
        (Some(i), Some(j)) if i == j => {
            inode::iput(i);
            inode::iput(j);
            if inode::active_count() == before {
                println!("test:    SUCCESS - slot shared and released");
            } else {
                println!("test:    FAILED - refcount leaked");
                return;
            }
        }
        _ => {
            println!("test:    FAILED - same inode got different slots");
            return;
        }
    }

    // 测试 3: 文件表分配与关闭
    println!("test: 3. File table alloc/close...");
    let open_before = file::open_count();
    match file::alloc(FileType::Device, true, true) {
        Some(fd) => {
            if file::open_count() != open_before + 1 {
                println!("test:    FAILED - open count did not grow");
                return;
            }
            file::close(fd);
            if file::open_count() == open_before {
                println!("test:    SUCCESS - slot allocated and reclaimed");
            } else {
                println!("test:    FAILED - slot not reclaimed");
                return;
            }
        }
        None => {
            println!("test:    FAILED - file table full right after boot");
            return;
        }
    }

    println!("test: fs testing completed.");
}
