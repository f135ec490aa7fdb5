//! 进程退出钩子

use tracing::error;

/// 致命错误时的终止钩子
///
/// 默认实现结束进程, 测试中可以替换为记录调用的实现。
pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: i32);
}

/// 结束当前进程
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: i32) {
        error!("进程退出, 退出码: {}", code);
        std::process::exit(code);
    }
}
