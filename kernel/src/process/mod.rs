//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 进程表
//!
//! 固定大小的表，每个槽位一把自旋锁。真正的用户态加载、
//! 地址空间切换不在本内核的范围内；第一个进程以内核线程的
//! 形式存在，调度器直接调用它的入口函数。

use core::sync::atomic::{AtomicU32, Ordering};

use spin::Mutex;

use crate::boot::InitError;
use crate::config::NPROC;
use crate::mm::kalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Unused,
    Runnable,
    Running,
    Zombie,
}

pub struct Proc {
    pub pid: u32,
    pub state: ProcState,
    pub name: &'static str,
    pub kstack: usize,
    pub entry: Option<fn()>,
}

impl Proc {
    const UNUSED: Proc = Proc {
        pid: 0,
        state: ProcState::Unused,
        name: "",
        kstack: 0,
        entry: None,
    };
}

static PROC_TABLE: [Mutex<Proc>; NPROC] = [const { Mutex::new(Proc::UNUSED) }; NPROC];

static NEXT_PID: AtomicU32 = AtomicU32::new(1);

fn alloc_pid() -> u32 {
    NEXT_PID.fetch_add(1, Ordering::Relaxed)
}

/// 初始化进程表：给每个槽位配一个内核栈（全局一次）
pub fn init() -> Result<(), InitError> {
    for slot in PROC_TABLE.iter() {
        let mut p = slot.lock();
        let stack = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;
        p.kstack = stack as usize;
    }
    Ok(())
}

/// 第一个进程的入口
fn first_process() {
    crate::println!("init: first process running");
}

/// 创建第一个进程（全局初始化序列的最后一步）
pub fn spawn_first() -> Result<(), InitError> {
    let mut p = PROC_TABLE[0].lock();
    if p.kstack == 0 {
        return Err(InitError::Unready("process table"));
    }
    p.pid = alloc_pid();
    p.name = "init";
    p.entry = Some(first_process);
    p.state = ProcState::Runnable;
    Ok(())
}

/// 取一个可运行的进程，标记为运行中，返回表下标（调度器用）
pub fn take_runnable() -> Option<usize> {
    for (i, slot) in PROC_TABLE.iter().enumerate() {
        let mut p = slot.lock();
        if p.state == ProcState::Runnable {
            p.state = ProcState::Running;
            return Some(i);
        }
    }
    None
}

/// 运行指定进程的入口函数，返回后进入僵尸态
pub fn run_entry(idx: usize) {
    let entry = { PROC_TABLE[idx].lock().entry };
    if let Some(f) = entry {
        f();
    }
    PROC_TABLE[idx].lock().state = ProcState::Zombie;
}

/// 指定 pid 的进程当前状态（诊断用）
pub fn state_of(pid: u32) -> Option<ProcState> {
    for slot in PROC_TABLE.iter() {
        let p = slot.lock();
        if p.pid == pid && p.state != ProcState::Unused {
            return Some(p.state);
        }
    }
    None
}
