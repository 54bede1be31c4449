//! RISC-V 64 位内核启动入口
//!
//! boot.S 负责：把 hartid 存进 tp、切换到本 hart 的启动栈、
//! 由第一个到达的 hart 清零 .bss，然后跳转 rust_main。

core::arch::global_asm!(include_str!("boot.S"));
