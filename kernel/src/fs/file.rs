//! 全局打开文件表

use spin::Mutex;

use crate::boot::InitError;
use crate::config::NFILE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    None,
    Pipe,
    Inode,
    Device,
}

pub struct File {
    pub ftype: FileType,
    refcnt: u32,
    pub readable: bool,
    pub writable: bool,
}

impl File {
    const CLOSED: File = File {
        ftype: FileType::None,
        refcnt: 0,
        readable: false,
        writable: false,
    };
}

static FTABLE: Mutex<[File; NFILE]> = Mutex::new([File::CLOSED; NFILE]);

/// 初始化打开文件表（全局一次）
pub fn init() -> Result<(), InitError> {
    let mut table = FTABLE.lock();
    for file in table.iter_mut() {
        *file = File::CLOSED;
    }
    Ok(())
}

/// 分配一个文件表槽位
pub fn alloc(ftype: FileType, readable: bool, writable: bool) -> Option<usize> {
    let mut table = FTABLE.lock();
    for (i, file) in table.iter_mut().enumerate() {
        if file.refcnt == 0 {
            file.ftype = ftype;
            file.refcnt = 1;
            file.readable = readable;
            file.writable = writable;
            return Some(i);
        }
    }
    None
}

/// 关闭一个文件表槽位（引用计数归零时回收）
pub fn close(idx: usize) {
    let mut table = FTABLE.lock();
    if idx < NFILE && table[idx].refcnt > 0 {
        table[idx].refcnt -= 1;
        if table[idx].refcnt == 0 {
            table[idx] = File::CLOSED;
        }
    }
}

/// 当前打开的文件数（诊断用）
pub fn open_count() -> usize {
    FTABLE.lock().iter().filter(|f| f.refcnt > 0).count()
}
