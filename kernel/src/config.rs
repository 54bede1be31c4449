//! rvix 内核配置（自动生成）
//!
//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 内核名称
pub const KERNEL_NAME: &str = "rvix";

/// 内核版本
pub const KERNEL_VERSION: &str = "0.1.0";

/// 目标平台
pub const TARGET_PLATFORM: &str = "riscv64";

// ============================================================
// SMP 配置
// ============================================================

/// 最大 hart 数量
pub const MAX_CPUS: usize = 4;

/// 启动核（负责全局初始化的那一个 hart）
pub const PRIMARY_HART: usize = 0;

// ============================================================
// 内存配置
// ============================================================

/// 页大小
pub const PAGE_SIZE: usize = 4096;

/// 页大小位移
pub const PAGE_SHIFT: usize = 12;

/// 内核堆大小（字节）
pub const KERNEL_HEAP_SIZE: usize = 1048576;

/// 内核装载基址（OpenSBI 之上）
pub const KERNBASE: usize = 0x80200000;

/// 物理内存上界
pub const PHYS_MEMORY_END: usize = 0x88000000;

/// 每个 hart 的启动栈大小（与 boot.S 中的 BOOT_STACK_SIZE 一致）
pub const BOOT_STACK_SIZE: usize = 16384;

// ============================================================
// 设备配置（QEMU virt 平台）
// ============================================================

/// UART0 寄存器基址
pub const UART0_BASE: usize = 0x10000000;

/// UART0 中断号
pub const UART0_IRQ: usize = 10;

/// VirtIO MMIO 基址
pub const VIRTIO0_BASE: usize = 0x10001000;

/// VirtIO 中断号
pub const VIRTIO0_IRQ: usize = 1;

/// PLIC 寄存器基址
pub const PLIC_BASE: usize = 0xc000000;

// ============================================================
// 内核表大小
// ============================================================

/// 进程表大小
pub const NPROC: usize = 64;

/// 块缓存条目数
pub const NBUF: usize = 30;

/// 内存 inode 表大小
pub const NINODE: usize = 50;

/// 全局打开文件表大小
pub const NFILE: usize = 100;

/// 块大小（字节）
pub const BSIZE: usize = 1024;

// ============================================================
// 调试配置
// ============================================================

/// 日志级别
pub const LOG_LEVEL: &str = "info";
