//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 块缓冲缓存
//!
//! 固定 NBUF 个槽位，整表一把自旋锁。命中直接拷贝，
//! 未命中找一个引用计数为零的槽位换入。

use spin::Mutex;

use crate::boot::InitError;
use crate::config::{BSIZE, NBUF};
use crate::drivers::virtio_blk;

struct Buf {
    blockno: u64,
    valid: bool,
    refcnt: u32,
    data: [u8; BSIZE],
}

impl Buf {
    const EMPTY: Buf = Buf {
        blockno: 0,
        valid: false,
        refcnt: 0,
        data: [0; BSIZE],
    };
}

static CACHE: Mutex<[Buf; NBUF]> = Mutex::new([Buf::EMPTY; NBUF]);

/// 初始化块缓存（全局一次）
pub fn init() -> Result<(), InitError> {
    let mut cache = CACHE.lock();
    for buf in cache.iter_mut() {
        buf.valid = false;
        buf.refcnt = 0;
        buf.blockno = 0;
    }
    Ok(())
}

/// 读一个块：命中走缓存，未命中从磁盘换入
pub fn read(blockno: u64, out: &mut [u8; BSIZE]) -> Result<(), InitError> {
    let mut cache = CACHE.lock();

    // 命中
    for buf in cache.iter_mut() {
        if buf.valid && buf.blockno == blockno {
            out.copy_from_slice(&buf.data);
            return Ok(());
        }
    }

    // 未命中：找一个空闲槽位换入
    for buf in cache.iter_mut() {
        if buf.refcnt == 0 {
            virtio_blk::read_block(blockno, &mut buf.data)?;
            buf.blockno = blockno;
            buf.valid = true;
            out.copy_from_slice(&buf.data);
            return Ok(());
        }
    }

    Err(InitError::Unready("buffer cache exhausted"))
}

/// 写一个块：写穿到磁盘，同时更新缓存里的副本
pub fn write(blockno: u64, data: &[u8; BSIZE]) -> Result<(), InitError> {
    virtio_blk::write_block(blockno, data)?;

    let mut cache = CACHE.lock();
    for buf in cache.iter_mut() {
        if buf.valid && buf.blockno == blockno {
            buf.data.copy_from_slice(data);
            break;
        }
    }
    Ok(())
}
