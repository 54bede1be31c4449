//! 设备驱动

pub mod plic;
pub mod virtio_blk;
