//! 宿主 bundle 钩子

use crate::bootstrap::Bootstrap;
use crate::configuration::Configuration;
use crate::environment::Environment;
use infrastructure_common::BundleError;
use std::sync::Arc;

/// 可配置的 bundle
///
/// 宿主在启动前调用一次 `initialize`, 服务器就绪后调用一次 `run`。
pub trait ConfiguredBundle<C: Configuration> {
    /// 启动前初始化
    fn initialize(&mut self, bootstrap: &Bootstrap) -> Result<(), BundleError>;

    /// 接入运行中的服务器
    fn run(&mut self, configuration: Arc<C>, environment: Arc<Environment>) -> Result<(), BundleError>;
}
