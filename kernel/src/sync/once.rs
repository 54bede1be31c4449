//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 一次性发布原语
//!
//! 启动标志的载体：写端 publish 恰好一次，读端自旋等待。
//! publish 在置位之前、wait 在观察到置位之后各执行一个全量 fence，
//! 构成 release/acquire 配对。缺了任何一侧，弱内存序的核都可能
//! 先看到标志、后看到标志所保护的初始化写入。

use core::hint::spin_loop;
use core::sync::atomic::{fence, AtomicBool, Ordering};

pub struct OnceFlag {
    flag: AtomicBool,
}

impl OnceFlag {
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// 发布：此前的所有内存写入先于标志对其他核可见。
    ///
    /// 标志只会从 false 变成 true，整个运行期间不会复位；
    /// 重复调用无害。
    pub fn publish(&self) {
        fence(Ordering::SeqCst);
        self.flag.store(true, Ordering::Release);
    }

    /// 自旋直到标志置位。
    ///
    /// acquire 读保证每一轮都真正访问内存，编译器不能把读提出循环。
    /// 返回前的 fence 与 publish 侧配对，之后读到的全局状态
    /// 一定是发布方完成初始化之后的值。
    pub fn wait(&self) {
        while !self.flag.load(Ordering::Acquire) {
            spin_loop();
        }
        fence(Ordering::SeqCst);
    }

    /// 非阻塞探测
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
