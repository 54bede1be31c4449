// 测试：多核启动
use crate::arch::smp;
use crate::boot;
use crate::println;

pub fn test_smp() {
    println!("test: Testing SMP boot...");

    let hart_id = smp::cpu_id();
    let started = smp::num_started_harts();
    println!("test: running on hart {}, {} hart(s) started", hart_id, started);

    // 测试 1: 等所有启动的 hart 走完自己的启动路径（有界自旋）
    println!("test: 1. Waiting for all harts to finish booting...");
    let mut spins: u64 = 0;
    while boot::harts_booted() < started && spins < 100_000_000 {
        core::hint::spin_loop();
        spins += 1;
    }
    let booted = boot::harts_booted();
    if booted == started {
        println!("test:    SUCCESS - {} hart(s) booted", booted);
    } else {
        println!("test:    FAILED - {} of {} hart(s) booted", booted, started);
        return;
    }

    // 测试 2: 每个 hart 的三个本核步骤各恰好一次
    println!("test: 2. Per-hart init steps ran once per hart...");
    let mut ok = true;
    for hart in 0..started {
        let (paging, trap, plic) = boot::per_hart_step_runs(hart);
        println!(
            "test:    hart {}: paging={} trap={} plic={}",
            hart, paging, trap, plic
        );
        if (paging, trap, plic) != (1, 1, 1) {
            ok = false;
        }
    }
    if ok {
        println!("test:    SUCCESS - per-hart steps each ran exactly once");
    } else {
        println!("test:    FAILED - per-hart step count mismatch");
    }

    println!("test: SMP boot testing completed.");
}
