//! rvix 内核构建脚本
//!
//! 编译前运行，负责：
//! 1. 解析工作区根目录的 Kernel.toml
//! 2. 生成 src/config.rs 常量代码
//! 3. 为 riscv64 目标挂上链接脚本

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=../Kernel.toml");
    println!("cargo:rerun-if-changed=src/linker.ld");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    // 链接脚本（只对 riscv64 目标生效）
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("riscv64") {
        println!(
            "cargo:rustc-link-arg-bins=-T{}",
            manifest_dir.join("src/linker.ld").display()
        );
    }

    let config_content =
        fs::read_to_string(manifest_dir.join("../Kernel.toml")).expect("无法读取 Kernel.toml");
    let config: toml::Value = toml::from_str(&config_content).expect("Kernel.toml 解析失败");

    generate_config_code(&config, &manifest_dir);
}

fn get_str<'a>(config: &'a toml::Value, section: &str, key: &str) -> &'a str {
    config
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("Kernel.toml 缺少 {}.{}", section, key))
}

fn get_int(config: &toml::Value, section: &str, key: &str) -> i64 {
    config
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or_else(|| panic!("Kernel.toml 缺少 {}.{}", section, key))
}

fn generate_config_code(config: &toml::Value, manifest_dir: &PathBuf) {
    let mut code = String::new();

    code.push_str("//! rvix 内核配置（自动生成）\n");
    code.push_str("//!\n");
    code.push_str("//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改\n\n");

    code.push_str("// ============================================================\n");
    code.push_str("// 基本信息\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// 内核名称\n");
    code.push_str(&format!(
        "pub const KERNEL_NAME: &str = \"{}\";\n\n",
        get_str(config, "general", "name")
    ));
    code.push_str("/// 内核版本\n");
    code.push_str(&format!(
        "pub const KERNEL_VERSION: &str = \"{}\";\n\n",
        get_str(config, "general", "version")
    ));
    code.push_str("/// 目标平台\n");
    code.push_str(&format!(
        "pub const TARGET_PLATFORM: &str = \"{}\";\n\n",
        get_str(config, "platform", "default_platform")
    ));

    code.push_str("// ============================================================\n");
    code.push_str("// SMP 配置\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// 最大 hart 数量\n");
    code.push_str(&format!(
        "pub const MAX_CPUS: usize = {};\n\n",
        get_int(config, "smp", "max_cpus")
    ));
    code.push_str("/// 启动核（负责全局初始化的那一个 hart）\n");
    code.push_str(&format!(
        "pub const PRIMARY_HART: usize = {};\n\n",
        get_int(config, "smp", "primary_hart")
    ));

    code.push_str("// ============================================================\n");
    code.push_str("// 内存配置\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// 页大小\n");
    code.push_str(&format!(
        "pub const PAGE_SIZE: usize = {};\n\n",
        get_int(config, "memory", "page_size")
    ));
    code.push_str("/// 页大小位移\n");
    code.push_str(&format!(
        "pub const PAGE_SHIFT: usize = {};\n\n",
        get_int(config, "memory", "page_shift")
    ));
    code.push_str("/// 内核堆大小（字节）\n");
    code.push_str(&format!(
        "pub const KERNEL_HEAP_SIZE: usize = {};\n\n",
        get_int(config, "memory", "kernel_heap_size")
    ));
    code.push_str("/// 内核装载基址（OpenSBI 之上）\n");
    code.push_str(&format!(
        "pub const KERNBASE: usize = {:#x};\n\n",
        get_int(config, "memory", "kernbase")
    ));
    code.push_str("/// 物理内存上界\n");
    code.push_str(&format!(
        "pub const PHYS_MEMORY_END: usize = {:#x};\n\n",
        get_int(config, "memory", "phys_memory_end")
    ));
    code.push_str("/// 每个 hart 的启动栈大小（与 boot.S 中的 BOOT_STACK_SIZE 一致）\n");
    code.push_str(&format!(
        "pub const BOOT_STACK_SIZE: usize = {};\n\n",
        get_int(config, "memory", "boot_stack_size")
    ));

    code.push_str("// ============================================================\n");
    code.push_str("// 设备配置（QEMU virt 平台）\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// UART0 寄存器基址\n");
    code.push_str(&format!(
        "pub const UART0_BASE: usize = {:#x};\n\n",
        get_int(config, "devices", "uart0_base")
    ));
    code.push_str("/// UART0 中断号\n");
    code.push_str(&format!(
        "pub const UART0_IRQ: usize = {};\n\n",
        get_int(config, "devices", "uart0_irq")
    ));
    code.push_str("/// VirtIO MMIO 基址\n");
    code.push_str(&format!(
        "pub const VIRTIO0_BASE: usize = {:#x};\n\n",
        get_int(config, "devices", "virtio0_base")
    ));
    code.push_str("/// VirtIO 中断号\n");
    code.push_str(&format!(
        "pub const VIRTIO0_IRQ: usize = {};\n\n",
        get_int(config, "devices", "virtio0_irq")
    ));
    code.push_str("/// PLIC 寄存器基址\n");
    code.push_str(&format!(
        "pub const PLIC_BASE: usize = {:#x};\n\n",
        get_int(config, "devices", "plic_base")
    ));

    code.push_str("// ============================================================\n");
    code.push_str("// 内核表大小\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// 进程表大小\n");
    code.push_str(&format!(
        "pub const NPROC: usize = {};\n\n",
        get_int(config, "tables", "nproc")
    ));
    code.push_str("/// 块缓存条目数\n");
    code.push_str(&format!(
        "pub const NBUF: usize = {};\n\n",
        get_int(config, "tables", "nbuf")
    ));
    code.push_str("/// 内存 inode 表大小\n");
    code.push_str(&format!(
        "pub const NINODE: usize = {};\n\n",
        get_int(config, "tables", "ninode")
    ));
    code.push_str("/// 全局打开文件表大小\n");
    code.push_str(&format!(
        "pub const NFILE: usize = {};\n\n",
        get_int(config, "tables", "nfile")
    ));
    code.push_str("/// 块大小（字节）\n");
    code.push_str(&format!(
        "pub const BSIZE: usize = {};\n\n",
        get_int(config, "tables", "block_size")
    ));

    code.push_str("// ============================================================\n");
    code.push_str("// 调试配置\n");
    code.push_str("// ============================================================\n\n");
    code.push_str("/// 日志级别\n");
    code.push_str(&format!(
        "pub const LOG_LEVEL: &str = \"{}\";\n",
        get_str(config, "debug", "log_level")
    ));

    let out = manifest_dir.join("src/config.rs");
    // 内容没变就不重写，避免无谓的重编译
    if fs::read_to_string(&out).map(|old| old == code).unwrap_or(false) {
        return;
    }
    fs::write(&out, code).expect("无法写入 src/config.rs");
}
