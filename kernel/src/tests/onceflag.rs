// 测试：一次性发布原语
use crate::println;
use crate::sync::OnceFlag;

pub fn test_onceflag() {
    println!("test: Testing OnceFlag...");

    // 测试 1: 新建标志必须是未置位
    println!("test: 1. Fresh flag is not set...");
    let flag = OnceFlag::new();
    if !flag.is_set() {
        println!("test:    SUCCESS - fresh flag unset");
    } else {
        println!("test:    FAILED - fresh flag already set");
        return;
    }

    // 测试 2: publish 之后可见
    println!("test: 2. Flag visible after publish...");
    flag.publish();
    if flag.is_set() {
        println!("test:    SUCCESS - flag set after publish");
    } else {
        println!("test:    FAILED - flag not set");
        return;
    }

    // 测试 3: 已置位时 wait 立即返回
    println!("test: 3. wait() returns on a set flag...");
    flag.wait();
    println!("test:    SUCCESS - wait returned");

    // 测试 4: 重复 publish 无害，标志单调（只会 false → true）
    println!("test: 4. publish is idempotent, flag never resets...");
    flag.publish();
    if flag.is_set() {
        println!("test:    SUCCESS - flag still set");
    } else {
        println!("test:    FAILED - flag reset (must never happen)");
    }

    println!("test: OnceFlag testing completed.");
}
