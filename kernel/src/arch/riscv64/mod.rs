//! RISC-V 64 位架构支持（RV64GC，S-mode，OpenSBI 之上）

pub mod boot;
pub mod cpu;
pub mod smp;
pub mod trap;
