//! 架构相关代码
//!
//! 当前支持的架构：
//! - **RISC-V (riscv64)** - QEMU virt 平台，默认启用

#[cfg(feature = "riscv64")]
pub mod riscv64;

#[cfg(feature = "riscv64")]
pub use riscv64::cpu;

#[cfg(feature = "riscv64")]
pub use riscv64::smp;

#[cfg(feature = "riscv64")]
pub use riscv64::trap;

#[cfg(feature = "riscv64")]
pub use riscv64::smp::cpu_id;
