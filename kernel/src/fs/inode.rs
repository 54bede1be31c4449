//! 内存 inode 表
//!
//! 活跃 inode 的驻留表：同一个 (dev, inum) 只占一个槽位，
//! 引用计数归零后槽位可以复用。

use spin::Mutex;

use crate::boot::InitError;
use crate::config::NINODE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    Free,
    Dir,
    File,
    Device,
}

pub struct Inode {
    pub dev: u32,
    pub inum: u32,
    refcnt: u32,
    pub itype: InodeType,
    pub size: u64,
}

impl Inode {
    const FREE: Inode = Inode {
        dev: 0,
        inum: 0,
        refcnt: 0,
        itype: InodeType::Free,
        size: 0,
    };
}

static ITABLE: Mutex<[Inode; NINODE]> = Mutex::new([Inode::FREE; NINODE]);

/// 初始化 inode 表（全局一次）
pub fn init() -> Result<(), InitError> {
    let mut table = ITABLE.lock();
    for inode in table.iter_mut() {
        *inode = Inode::FREE;
    }
    Ok(())
}

/// 取 (dev, inum) 对应的 inode 槽位，必要时分配；返回下标
pub fn iget(dev: u32, inum: u32) -> Option<usize> {
    let mut table = ITABLE.lock();

    let mut empty = None;
    for (i, inode) in table.iter_mut().enumerate() {
        if inode.refcnt > 0 && inode.dev == dev && inode.inum == inum {
            inode.refcnt += 1;
            return Some(i);
        }
        if empty.is_none() && inode.refcnt == 0 {
            empty = Some(i);
        }
    }

    let i = empty?;
    let inode = &mut table[i];
    inode.dev = dev;
    inode.inum = inum;
    inode.refcnt = 1;
    inode.itype = InodeType::Free;
    inode.size = 0;
    Some(i)
}

/// 释放一个 inode 引用
pub fn iput(idx: usize) {
    let mut table = ITABLE.lock();
    if idx < NINODE && table[idx].refcnt > 0 {
        table[idx].refcnt -= 1;
    }
}

/// 当前被引用的 inode 数（诊断用）
pub fn active_count() -> usize {
    ITABLE.lock().iter().filter(|i| i.refcnt > 0).count()
}
