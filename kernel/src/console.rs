//! 控制台驱动（NS16550A UART，QEMU virt 平台）
//!
//! 输出子系统两段初始化的第一段：console::init() 配置 UART 设备本身，
//! 第二段（格式化输出）见 print::init()。

use core::ptr::{read_volatile, write_volatile};

use crate::config::UART0_BASE;

// 寄存器偏移
const RHR: usize = 0; // 接收保持寄存器（读）
const THR: usize = 0; // 发送保持寄存器（写）
const IER: usize = 1; // 中断使能
const FCR: usize = 2; // FIFO 控制
const LCR: usize = 3; // 线路控制
const LSR: usize = 5; // 线路状态

const LSR_RX_READY: u8 = 1 << 0;
const LSR_TX_IDLE: u8 = 1 << 5;

pub struct Uart {
    base: usize,
}

impl Uart {
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    fn read_reg(&self, off: usize) -> u8 {
        unsafe { read_volatile((self.base + off) as *const u8) }
    }

    fn write_reg(&self, off: usize, v: u8) {
        unsafe { write_volatile((self.base + off) as *mut u8, v) }
    }

    /// 设备初始化：8N1、使能 FIFO、打开接收中断
    pub fn init(&self) {
        // 配置期间先关掉中断
        self.write_reg(IER, 0x00);
        // LCR 最高位进入波特率设置模式
        self.write_reg(LCR, 0x80);
        // 波特率除数 3（38.4K）
        self.write_reg(0, 0x03);
        self.write_reg(1, 0x00);
        // 8 数据位、无校验、1 停止位
        self.write_reg(LCR, 0x03);
        // 使能并清空收发 FIFO
        self.write_reg(FCR, 0x07);
        // 打开接收中断
        self.write_reg(IER, 0x01);
    }

    /// 同步写一个字节（忙等发送缓冲空闲）
    pub fn putc(&self, c: u8) {
        while self.read_reg(LSR) & LSR_TX_IDLE == 0 {}
        self.write_reg(THR, c);
    }

    pub fn getc(&self) -> Option<u8> {
        if self.read_reg(LSR) & LSR_RX_READY != 0 {
            Some(self.read_reg(RHR))
        } else {
            None
        }
    }
}

static UART: Uart = Uart::new(UART0_BASE);

/// 初始化控制台设备（只在启动核执行，先于一切其他初始化）
pub fn init() {
    UART.init();
}

pub fn putchar(c: u8) {
    UART.putc(c);
}

pub fn getchar() -> Option<u8> {
    UART.getc()
}

/// UART 接收中断：目前只做回显
pub fn handle_interrupt() {
    while let Some(c) = getchar() {
        putchar(c);
    }
}
