//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! VirtIO 块设备驱动（virtio-mmio v2，QEMU virt 平台）
//!
//! 只实现启动需要的最小功能：设备探测、队列建立、同步读写。
//! 需要 QEMU 以 `-global virtio-mmio.force-legacy=false` 运行。
//! 这是启动序列里唯一会在正常配置下失败的一步（没挂磁盘）。

use core::ptr::{self, read_volatile, write_volatile};
use core::sync::atomic::{fence, Ordering};

use spin::Mutex;

use crate::boot::InitError;
use crate::config::{BSIZE, VIRTIO0_BASE};
use crate::mm::kalloc;

// MMIO 寄存器偏移
mod reg {
    pub const MAGIC_VALUE: usize = 0x000;
    pub const VERSION: usize = 0x004;
    pub const DEVICE_ID: usize = 0x008;
    pub const DEVICE_FEATURES: usize = 0x010;
    pub const DRIVER_FEATURES: usize = 0x020;
    pub const QUEUE_SEL: usize = 0x030;
    pub const QUEUE_NUM_MAX: usize = 0x034;
    pub const QUEUE_NUM: usize = 0x038;
    pub const QUEUE_READY: usize = 0x044;
    pub const QUEUE_NOTIFY: usize = 0x050;
    pub const INTERRUPT_STATUS: usize = 0x060;
    pub const INTERRUPT_ACK: usize = 0x064;
    pub const STATUS: usize = 0x070;
    pub const QUEUE_DESC_LOW: usize = 0x080;
    pub const QUEUE_DESC_HIGH: usize = 0x084;
    pub const QUEUE_DRIVER_LOW: usize = 0x090;
    pub const QUEUE_DRIVER_HIGH: usize = 0x094;
    pub const QUEUE_DEVICE_LOW: usize = 0x0a0;
    pub const QUEUE_DEVICE_HIGH: usize = 0x0a4;
}

const MAGIC: u32 = 0x7472_6976; // "virt"
const DEVICE_BLK: u32 = 2;

// 设备状态位
const STATUS_ACKNOWLEDGE: u32 = 1;
const STATUS_DRIVER: u32 = 2;
const STATUS_DRIVER_OK: u32 = 4;
const STATUS_FEATURES_OK: u32 = 8;

// 不需要的特性位，协商时关掉
const F_BLK_RO: u32 = 5;
const F_BLK_SCSI: u32 = 7;
const F_BLK_CONFIG_WCE: u32 = 11;
const F_BLK_MQ: u32 = 12;
const F_ANY_LAYOUT: u32 = 27;
const F_RING_INDIRECT_DESC: u32 = 28;
const F_RING_EVENT_IDX: u32 = 29;

const QUEUE_SIZE: usize = 8;

#[repr(C, align(16))]
#[derive(Clone, Copy)]
struct Desc {
    addr: u64,
    len: u32,
    flags: u16,
    next: u16,
}

const DESC_F_NEXT: u16 = 1;
const DESC_F_WRITE: u16 = 2;

#[repr(C)]
struct Avail {
    flags: u16,
    idx: u16,
    ring: [u16; QUEUE_SIZE],
    unused: u16,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct UsedElem {
    id: u32,
    len: u32,
}

#[repr(C)]
struct Used {
    flags: u16,
    idx: u16,
    ring: [UsedElem; QUEUE_SIZE],
}

/// 块请求头（描述符链的第一项）
#[repr(C)]
struct BlkReq {
    type_: u32,
    reserved: u32,
    sector: u64,
}

const BLK_T_IN: u32 = 0;
const BLK_T_OUT: u32 = 1;

struct Disk {
    desc: *mut Desc,
    avail: *mut Avail,
    used: *mut Used,
    /// 请求头和状态字节的常驻页
    req: *mut BlkReq,
    status: *mut u8,
    used_seen: u16,
    ready: bool,
}

// 裸指针只在锁内使用
unsafe impl Send for Disk {}

static DISK: Mutex<Disk> = Mutex::new(Disk {
    desc: ptr::null_mut(),
    avail: ptr::null_mut(),
    used: ptr::null_mut(),
    req: ptr::null_mut(),
    status: ptr::null_mut(),
    used_seen: 0,
    ready: false,
});

fn read_reg(off: usize) -> u32 {
    unsafe { read_volatile((VIRTIO0_BASE + off) as *const u32) }
}

fn write_reg(off: usize, v: u32) {
    unsafe { write_volatile((VIRTIO0_BASE + off) as *mut u32, v) }
}

/// 探测并初始化磁盘（全局一次）
pub fn init() -> Result<(), InitError> {
    if read_reg(reg::MAGIC_VALUE) != MAGIC
        || read_reg(reg::VERSION) != 2
        || read_reg(reg::DEVICE_ID) != DEVICE_BLK
    {
        return Err(InitError::DeviceAbsent("virtio-blk"));
    }

    let mut status = 0u32;
    status |= STATUS_ACKNOWLEDGE;
    write_reg(reg::STATUS, status);
    status |= STATUS_DRIVER;
    write_reg(reg::STATUS, status);

    // 特性协商
    let mut features = read_reg(reg::DEVICE_FEATURES);
    features &= !(1 << F_BLK_RO);
    features &= !(1 << F_BLK_SCSI);
    features &= !(1 << F_BLK_CONFIG_WCE);
    features &= !(1 << F_BLK_MQ);
    features &= !(1 << F_ANY_LAYOUT);
    features &= !(1 << F_RING_INDIRECT_DESC);
    features &= !(1 << F_RING_EVENT_IDX);
    write_reg(reg::DRIVER_FEATURES, features);
    status |= STATUS_FEATURES_OK;
    write_reg(reg::STATUS, status);

    // 队列 0
    write_reg(reg::QUEUE_SEL, 0);
    if read_reg(reg::QUEUE_READY) != 0 {
        return Err(InitError::Unready("virtio queue already live"));
    }
    let max = read_reg(reg::QUEUE_NUM_MAX);
    if max == 0 {
        return Err(InitError::DeviceAbsent("virtio-blk queue"));
    }
    if (max as usize) < QUEUE_SIZE {
        return Err(InitError::Unready("virtio queue too small"));
    }
    write_reg(reg::QUEUE_NUM, QUEUE_SIZE as u32);

    let desc_page = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;
    let avail_page = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;
    let used_page = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;
    let req_page = kalloc::alloc_page().ok_or(InitError::OutOfMemory)?;

    write_reg(reg::QUEUE_DESC_LOW, desc_page as usize as u32);
    write_reg(reg::QUEUE_DESC_HIGH, (desc_page as usize >> 32) as u32);
    write_reg(reg::QUEUE_DRIVER_LOW, avail_page as usize as u32);
    write_reg(reg::QUEUE_DRIVER_HIGH, (avail_page as usize >> 32) as u32);
    write_reg(reg::QUEUE_DEVICE_LOW, used_page as usize as u32);
    write_reg(reg::QUEUE_DEVICE_HIGH, (used_page as usize >> 32) as u32);
    write_reg(reg::QUEUE_READY, 1);

    {
        let mut disk = DISK.lock();
        disk.desc = desc_page as *mut Desc;
        disk.avail = avail_page as *mut Avail;
        disk.used = used_page as *mut Used;
        disk.req = req_page as *mut BlkReq;
        // 状态字节放在请求头后面，同一页里
        disk.status = unsafe { req_page.add(core::mem::size_of::<BlkReq>()) };
        disk.used_seen = 0;
        disk.ready = true;
    }

    status |= STATUS_DRIVER_OK;
    write_reg(reg::STATUS, status);

    log::info!("virtio-blk: disk online, queue size {}", QUEUE_SIZE);
    Ok(())
}

/// 同步提交一个读/写请求并轮询完成。
/// 一次只有一个在途请求，整个过程持有磁盘锁。
fn rw(blockno: u64, data: *mut u8, write: bool) -> Result<(), InitError> {
    // 一个文件系统块对应两个 512 字节扇区
    let sector = blockno * (BSIZE as u64 / 512);

    let mut disk = DISK.lock();
    if !disk.ready {
        return Err(InitError::Unready("virtio-blk"));
    }

    unsafe {
        (*disk.req).type_ = if write { BLK_T_OUT } else { BLK_T_IN };
        (*disk.req).reserved = 0;
        (*disk.req).sector = sector;
        *disk.status = 0xff;

        // 三段描述符链：请求头 → 数据 → 状态字节
        let desc = disk.desc;
        *desc.add(0) = Desc {
            addr: disk.req as u64,
            len: core::mem::size_of::<BlkReq>() as u32,
            flags: DESC_F_NEXT,
            next: 1,
        };
        *desc.add(1) = Desc {
            addr: data as u64,
            len: BSIZE as u32,
            flags: if write { DESC_F_NEXT } else { DESC_F_NEXT | DESC_F_WRITE },
            next: 2,
        };
        *desc.add(2) = Desc {
            addr: disk.status as u64,
            len: 1,
            flags: DESC_F_WRITE,
            next: 0,
        };

        let avail = disk.avail;
        let slot = (*avail).idx as usize % QUEUE_SIZE;
        (*avail).ring[slot] = 0;
        fence(Ordering::SeqCst);
        (*avail).idx = (*avail).idx.wrapping_add(1);
        fence(Ordering::SeqCst);

        write_reg(reg::QUEUE_NOTIFY, 0);

        // 轮询 used 环
        loop {
            fence(Ordering::SeqCst);
            if (*disk.used).idx != disk.used_seen {
                break;
            }
            core::hint::spin_loop();
        }
        disk.used_seen = disk.used_seen.wrapping_add(1);

        if *disk.status != 0 {
            return Err(InitError::DeviceAbsent("virtio-blk request failed"));
        }
    }
    Ok(())
}

/// 读一个块
pub fn read_block(blockno: u64, data: &mut [u8; BSIZE]) -> Result<(), InitError> {
    rw(blockno, data.as_mut_ptr(), false)
}

/// 写一个块
pub fn write_block(blockno: u64, data: &[u8; BSIZE]) -> Result<(), InitError> {
    rw(blockno, data.as_ptr() as *mut u8, true)
}

/// virtio 中断：应答即可，完成同步在 rw 的轮询里做
pub fn handle_interrupt() {
    let status = read_reg(reg::INTERRUPT_STATUS);
    write_reg(reg::INTERRUPT_ACK, status & 0x3);
}
