//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! RISC-V SMP 支持
//!
//! hart 的唤醒与计数。启动编排本身在 boot.rs，这里只提供
//! 平台侧的两件事：hart 身份（tp 寄存器）和 SBI hart_start。

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::MAX_CPUS;

/// 第一个进入内核的 hart（负责唤醒其余 hart，不一定是启动核）
static FIRST_HART: AtomicU32 = AtomicU32::new(u32::MAX);

/// 成功进入内核的 hart 数（含第一个）
static HARTS_STARTED: AtomicU32 = AtomicU32::new(0);

/// 获取当前 hart 的 ID
///
/// boot.S 在入口把 hartid 存进 tp，trap.S 在异常路径上不碰 tp，
/// 所以 tp 始终有效。mhartid CSR 是 M-mode 专属，S-mode 读会触发异常。
#[inline]
pub fn cpu_id() -> usize {
    let hartid: u64;
    unsafe {
        core::arch::asm!("mv {}, tp", out(reg) hartid, options(nomem, nostack, pure));
    }
    hartid as usize
}

/// 由第一个进入内核的 hart 通过 SBI 唤醒其余 hart。
///
/// OpenSBI 只把一个 hart 交给内核，其余 hart 停在固件里等
/// hart_start。被唤醒的 hart 与本 hart 走完全相同的入口
/// （_start → rust_main），用 CAS 保证唤醒只发生一次。
pub fn start_other_harts(my_hart: usize) {
    if FIRST_HART
        .compare_exchange(u32::MAX, my_hart as u32, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        // 不是第一个到达的 hart
        return;
    }

    extern "C" {
        fn _start();
    }
    let entry = _start as usize;

    let mut started: u32 = 1; // 自己
    for hart in 0..MAX_CPUS {
        if hart == my_hart {
            continue;
        }
        let ret = sbi_rt::hart_start(hart, entry, 0);
        if ret.error == 0 {
            started += 1;
        }
    }
    HARTS_STARTED.store(started, Ordering::Release);
}

/// 成功进入内核的 hart 数
pub fn num_started_harts() -> usize {
    let n = HARTS_STARTED.load(Ordering::Acquire);
    if n == 0 {
        1
    } else {
        n as usize
    }
}
