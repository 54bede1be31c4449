//! 文件系统层
//!
//! 启动序列只负责把三张表建好：块缓存、内存 inode 表、
//! 打开文件表。真正的磁盘文件系统格式不在本内核范围内。

pub mod bio;
pub mod file;
pub mod inode;
