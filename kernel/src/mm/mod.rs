//! 内存管理模块

pub mod heap;
pub mod kalloc;
pub mod vm;
