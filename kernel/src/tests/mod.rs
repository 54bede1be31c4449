//! 单元测试模块
//!
//! 所有单元测试都在启动完成后、进入调度器之前由启动核运行，
//! 使用 `unit-test` 特性控制编译。
//!
//! 运行测试（目标三元组由 .cargo/config.toml 指定）：
//! ```bash
//! cargo build --package rvix --features riscv64,unit-test
//! qemu-system-riscv64 -M virt -m 128M -smp 4 -nographic \
//!   -global virtio-mmio.force-legacy=false \
//!   -drive file=fs.img,if=none,format=raw,id=x0 \
//!   -device virtio-blk-device,drive=x0 \
//!   -kernel target/riscv64gc-unknown-none-elf/debug/rvix
//! ```

use crate::println;

pub mod bootseq;
pub mod fs;
pub mod heap;
pub mod onceflag;
pub mod smp;

/// 运行所有单元测试（只在启动核调用）
pub fn run_all_tests() {
    println!("test: ===== Starting rvix Unit Tests =====");

    // 1. 一次性发布原语
    onceflag::test_onceflag();

    // 2. 启动序列执行器
    bootseq::test_bootseq();

    // 3. 多核启动
    smp::test_smp();

    // 4. 内核堆与物理页分配器
    heap::test_heap();
    heap::test_kalloc();

    // 5. 文件系统各张表
    fs::test_fs();

    println!("test: ===== All Unit Tests Completed =====");
}
