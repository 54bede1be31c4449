//! 同步原语
//!
//! 启动阶段没有调度器，也就没有睡眠锁可用；这里只提供
//! 忙等类的原语。子系统内部的互斥用 `spin::Mutex`。

pub mod once;

pub use once::OnceFlag;
