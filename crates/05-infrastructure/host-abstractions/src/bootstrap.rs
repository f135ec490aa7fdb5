//! 启动前上下文

use parking_lot::RwLock;

/// 宿主启动上下文
///
/// 在 `initialize` 阶段提供给各个 bundle, 用于登记额外的 bundle。
#[derive(Debug)]
pub struct Bootstrap {
    application_name: String,
    bundles: RwLock<Vec<String>>,
}

impl Bootstrap {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            bundles: RwLock::new(Vec::new()),
        }
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// 登记一个 bundle
    pub fn add_bundle(&self, name: impl Into<String>) {
        self.bundles.write().push(name.into());
    }

    /// 已登记的 bundle
    pub fn bundles(&self) -> Vec<String> {
        self.bundles.read().clone()
    }
}
