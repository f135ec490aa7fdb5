//! 默认注入器工厂

use crate::injector::InjectorImpl;
use di_abstractions::{Injector, InjectorFactory, Module};
use infrastructure_common::{DependencyError, Stage};
use std::sync::Arc;
use tracing::debug;

/// 默认注入器工厂
///
/// 直接以 [`InjectorImpl`] 构建根注入器。
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInjectorFactory;

impl DefaultInjectorFactory {
    pub fn new() -> Self {
        Self
    }
}

impl InjectorFactory for DefaultInjectorFactory {
    fn create(
        &self,
        stage: Stage,
        modules: Vec<Arc<dyn Module>>,
    ) -> Result<Arc<dyn Injector>, DependencyError> {
        debug!("使用默认工厂创建注入器: {} 个模块", modules.len());
        let injector: Arc<dyn Injector> = InjectorImpl::create(stage, &modules)?;
        Ok(injector)
    }
}
