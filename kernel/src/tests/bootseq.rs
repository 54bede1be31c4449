// 测试：启动序列执行器
use core::sync::atomic::{AtomicU32, Ordering};

use crate::boot::{self, InitError, InitStep};
use crate::println;
use crate::process;

// 一张临时表的执行痕迹：每步记下自己是第几个执行的
static SEQ: AtomicU32 = AtomicU32::new(0);
static STAMPS: [AtomicU32; 3] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];

fn reset_stamps() {
    SEQ.store(0, Ordering::Release);
    for stamp in STAMPS.iter() {
        stamp.store(0, Ordering::Release);
    }
}

fn stamp(i: usize) {
    STAMPS[i].store(SEQ.fetch_add(1, Ordering::AcqRel) + 1, Ordering::Release);
}

fn step_one() -> Result<(), InitError> {
    stamp(0);
    Ok(())
}

fn step_two() -> Result<(), InitError> {
    stamp(1);
    Ok(())
}

fn step_three() -> Result<(), InitError> {
    stamp(2);
    Ok(())
}

fn step_broken() -> Result<(), InitError> {
    Err(InitError::DeviceAbsent("scratch device"))
}

pub fn test_bootseq() {
    println!("test: Testing boot sequence runner...");

    // 测试 1: 表驱动执行，按表顺序各恰好一次
    println!("test: 1. Steps run in table order, once each...");
    reset_stamps();
    let table = [
        InitStep { name: "one", run: step_one },
        InitStep { name: "two", run: step_two },
        InitStep { name: "three", run: step_three },
    ];
    match boot::run_sequence(&table) {
        Ok(()) => {
            let order = (
                STAMPS[0].load(Ordering::Acquire),
                STAMPS[1].load(Ordering::Acquire),
                STAMPS[2].load(Ordering::Acquire),
            );
            if order == (1, 2, 3) {
                println!("test:    SUCCESS - order is (1, 2, 3)");
            } else {
                println!("test:    FAILED - order is {:?}", order);
                return;
            }
        }
        Err(err) => {
            println!("test:    FAILED - unexpected error at '{}'", err.step);
            return;
        }
    }

    // 测试 2: 第一个失败立即终止，后面的步骤不执行
    println!("test: 2. Fail-fast stops the sequence...");
    reset_stamps();
    let broken = [
        InitStep { name: "one", run: step_one },
        InitStep { name: "broken", run: step_broken },
        InitStep { name: "three", run: step_three },
    ];
    match boot::run_sequence(&broken) {
        Ok(()) => {
            println!("test:    FAILED - broken sequence reported success");
            return;
        }
        Err(err) => {
            if err.step == "broken" && STAMPS[2].load(Ordering::Acquire) == 0 {
                println!("test:    SUCCESS - stopped at '{}', later steps not run", err.step);
            } else {
                println!("test:    FAILED - stopped at '{}' but step three ran", err.step);
                return;
            }
        }
    }

    // 测试 3: 全局初始化序列整机恰好完成一次
    println!("test: 3. Global init ran exactly once...");
    let runs = boot::global_init_runs();
    if runs == 1 {
        println!("test:    SUCCESS - global init runs = 1");
    } else {
        println!("test:    FAILED - global init runs = {}", runs);
    }

    // 测试 4: 启动标志已发布（且由测试 1 的序列执行可知从未复位）
    println!("test: 4. Boot flag is published...");
    if boot::started() {
        println!("test:    SUCCESS - boot flag set");
    } else {
        println!("test:    FAILED - boot flag unset after boot");
        return;
    }

    // 测试 5: 第一个进程已经在进程表里
    // （次核此刻可能已经把它调度起来，状态不作假设）
    println!("test: 5. First process exists...");
    match process::state_of(1) {
        Some(state) => println!("test:    SUCCESS - pid 1 present, state {:?}", state),
        None => println!("test:    FAILED - pid 1 missing from process table"),
    }

    println!("test: boot sequence testing completed.");
}
