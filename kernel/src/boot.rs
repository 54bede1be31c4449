//! MIT License
//!
//! Copyright (c) 2026 rvix developers
//!

//! 多核启动编排
//!
//! 每个 hart 上电后都会进入这里的 main()。启动核（hart 0）按固定顺序
//! 完成全局子系统初始化，然后发布启动标志；其余 hart 自旋等待该标志，
//! 再各自完成本核硬件初始化。OnceFlag 两侧的 fence 配对保证全局
//! 初始化的全部效果在次核越过标志之前已经可见。
//!
//! 初始化顺序用数据表描述而不是写死在控制流里：每一步是一个可失败的
//! 函数，顺序编码真实的依赖关系（先有物理页分配器才能建页表，先装好
//! 异常向量才能开设备中断，等等）。第一个失败立即终止整个序列并停机，
//! 没有任何恢复路径——半初始化的内核没有继续运行的意义。

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::{KERNEL_NAME, KERNEL_VERSION, MAX_CPUS, PRIMARY_HART, TARGET_PLATFORM};
use crate::sync::OnceFlag;
use crate::{arch, console, drivers, fs, logger, mm, print, process, sched};
use crate::println;

/// 初始化失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// 物理内存不足
    OutOfMemory,
    /// 设备不存在或探测失败
    DeviceAbsent(&'static str),
    /// 依赖的子系统尚未就绪
    Unready(&'static str),
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::OutOfMemory => write!(f, "out of physical memory"),
            InitError::DeviceAbsent(dev) => write!(f, "device absent: {}", dev),
            InitError::Unready(what) => write!(f, "dependency not ready: {}", what),
        }
    }
}

/// 启动失败：带上失败的那一步
#[derive(Debug, Clone, Copy)]
pub struct BootError {
    pub step: &'static str,
    pub cause: InitError,
}

/// 初始化序列中的一步
pub struct InitStep {
    pub name: &'static str,
    pub run: fn() -> Result<(), InitError>,
}

/// 启动标志：全局初始化已完成且对所有核可见。
/// 整个运行期间只有一次 false → true 的迁移。
static STARTED: OnceFlag = OnceFlag::new();

/// 全局初始化序列的完成次数（不论几个核，必须恰好为 1）
static GLOBAL_RUNS: AtomicU32 = AtomicU32::new(0);

/// 各 hart 走完自己启动路径（到达调度器交接点）的次数
static HART_BOOTED: [AtomicU32; MAX_CPUS] = [
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
];

// 本核三步各自的执行计数，按 hart 记账（每个启动的 hart 各恰好一次）
static PAGING_ON_RUNS: [AtomicU32; MAX_CPUS] = [
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
];
static TRAP_ON_RUNS: [AtomicU32; MAX_CPUS] = [
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
];
static PLIC_ON_RUNS: [AtomicU32; MAX_CPUS] = [
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
    AtomicU32::new(0),
];

fn record(counters: &[AtomicU32; MAX_CPUS]) {
    let hart = arch::cpu_id();
    if hart < MAX_CPUS {
        counters[hart].fetch_add(1, Ordering::AcqRel);
    }
}

// 本核步骤的包装：调用协作者，然后给当前 hart 记一次账

fn paging_on() -> Result<(), InitError> {
    mm::vm::init_hart()?;
    record(&PAGING_ON_RUNS);
    Ok(())
}

fn trap_on() -> Result<(), InitError> {
    arch::trap::init_hart();
    record(&TRAP_ON_RUNS);
    Ok(())
}

fn plic_on() -> Result<(), InitError> {
    drivers::plic::init_hart(arch::cpu_id());
    record(&PLIC_ON_RUNS);
    Ok(())
}

fn trap_init() -> Result<(), InitError> {
    arch::trap::init();
    Ok(())
}

fn plic_init() -> Result<(), InitError> {
    drivers::plic::init();
    Ok(())
}

/// 全局初始化序列（只在启动核执行一次）。
///
/// 顺序即依赖：物理页分配器 → 内核堆 → 内核页表 → 本核开分页 →
/// 进程表 → trap 全局状态 → 本核异常向量 → PLIC 全局 → PLIC 本核 →
/// 块缓存 → inode 表 → 打开文件表 → 磁盘 → 第一个进程。
static GLOBAL_INIT: &[InitStep] = &[
    InitStep { name: "kalloc", run: mm::kalloc::init },
    InitStep { name: "heap", run: mm::heap::init },
    InitStep { name: "kvm", run: mm::vm::init },
    InitStep { name: "kvm/hart", run: paging_on },
    InitStep { name: "proc", run: process::init },
    InitStep { name: "trap", run: trap_init },
    InitStep { name: "trap/hart", run: trap_on },
    InitStep { name: "plic", run: plic_init },
    InitStep { name: "plic/hart", run: plic_on },
    InitStep { name: "bio", run: fs::bio::init },
    InitStep { name: "inode", run: fs::inode::init },
    InitStep { name: "file", run: fs::file::init },
    InitStep { name: "virtio-disk", run: drivers::virtio_blk::init },
    InitStep { name: "first-proc", run: process::spawn_first },
];

/// 次核只做本核硬件初始化，顺序与启动核一致
static HART_INIT: &[InitStep] = &[
    InitStep { name: "kvm/hart", run: paging_on },
    InitStep { name: "trap/hart", run: trap_on },
    InitStep { name: "plic/hart", run: plic_on },
];

/// 顺序执行一张初始化表，第一个失败立即返回。
///
/// 这是整个启动序列唯一的执行点，也是测试观察序列行为的挂接点。
pub fn run_sequence(steps: &[InitStep]) -> Result<(), BootError> {
    for step in steps {
        match (step.run)() {
            Ok(()) => println!("boot: {} [OK]", step.name),
            Err(cause) => {
                return Err(BootError {
                    step: step.name,
                    cause,
                })
            }
        }
    }
    Ok(())
}

/// 启动编排入口：每个 hart 恰好进入一次，永不返回
pub fn main(hartid: usize) -> ! {
    if hartid == PRIMARY_HART {
        // 输出子系统分两段：先 UART 设备，再格式化输出，
        // 之后的每一步初始化都依赖它打进度
        console::init();
        print::init();
        logger::init();

        println!();
        println!("{} kernel is booting", KERNEL_NAME);
        println!();
        log::info!("version {} ({})", KERNEL_VERSION, TARGET_PLATFORM);
        println!(
            "boot: hart {} is primary, {} hart(s) online",
            hartid,
            arch::smp::num_started_harts()
        );

        if let Err(err) = run_sequence(GLOBAL_INIT) {
            fatal(err);
        }
        GLOBAL_RUNS.fetch_add(1, Ordering::AcqRel);

        // publish 内部先做全量 fence：上面所有初始化写入
        // 必须先于标志对次核可见
        STARTED.publish();
    } else {
        // 次核唯一允许的等待方式就是自旋——此刻既没有调度器，
        // 也没有任何睡眠/唤醒机制。wait 在观察到标志之后执行
        // 与 publish 配对的 fence。
        STARTED.wait();

        println!("hart {} starting", hartid);

        if let Err(err) = run_sequence(HART_INIT) {
            fatal(err);
        }
    }

    if hartid < MAX_CPUS {
        HART_BOOTED[hartid].fetch_add(1, Ordering::AcqRel);
    }

    #[cfg(feature = "unit-test")]
    if hartid == PRIMARY_HART {
        crate::tests::run_all_tests();
    }

    // 交接给调度器。多个 hart 并发进入由调度器自己保证安全。
    sched::run()
}

/// 致命启动失败：报告失败的那一步，然后停住当前 hart。
///
/// 启动核停机意味着标志永远不会发布，次核会永远留在自旋等待里；
/// 这是预期的整机失败形态，而不是需要处理的错误。
fn fatal(err: BootError) -> ! {
    println!("boot: FATAL: step '{}' failed: {}", err.step, err.cause);
    arch::cpu::disable_irq();
    halt()
}

/// 停住当前 hart
pub fn halt() -> ! {
    loop {
        arch::cpu::wfi();
    }
}

// 观测接口（测试和诊断用）

/// 启动标志是否已发布
pub fn started() -> bool {
    STARTED.is_set()
}

/// 全局初始化序列完成的次数
pub fn global_init_runs() -> u32 {
    GLOBAL_RUNS.load(Ordering::Acquire)
}

/// 已经走完启动路径的 hart 数
pub fn harts_booted() -> usize {
    let mut n = 0;
    for counter in HART_BOOTED.iter() {
        if counter.load(Ordering::Acquire) > 0 {
            n += 1;
        }
    }
    n
}

/// 指定 hart 的三个本核步骤（分页、异常向量、PLIC）各执行了几次
pub fn per_hart_step_runs(hart: usize) -> (u32, u32, u32) {
    if hart >= MAX_CPUS {
        return (0, 0, 0);
    }
    (
        PAGING_ON_RUNS[hart].load(Ordering::Acquire),
        TRAP_ON_RUNS[hart].load(Ordering::Acquire),
        PLIC_ON_RUNS[hart].load(Ordering::Acquire),
    )
}
