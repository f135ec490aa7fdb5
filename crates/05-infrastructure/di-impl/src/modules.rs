//! 模块组合工具

use crate::binder::BindingCollector;
use di_abstractions::{Binder, Module};
use infrastructure_common::DependencyError;
use std::sync::Arc;
use tracing::debug;

/// 模块组合工具
pub struct Modules;

impl Modules {
    /// 以 `overrides` 中的绑定覆盖 `base` 中同键的绑定
    pub fn override_with(
        base: Vec<Arc<dyn Module>>,
        overrides: Vec<Arc<dyn Module>>,
    ) -> Arc<dyn Module> {
        Arc::new(OverrideModule { base, overrides })
    }

    /// 把多个模块合并为一个
    pub fn combine(modules: Vec<Arc<dyn Module>>) -> Arc<dyn Module> {
        Arc::new(CombinedModule { modules })
    }
}

struct OverrideModule {
    base: Vec<Arc<dyn Module>>,
    overrides: Vec<Arc<dyn Module>>,
}

impl Module for OverrideModule {
    fn name(&self) -> &str {
        "OverrideModule"
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        let base = BindingCollector::collect(binder.stage(), &self.base)?;
        let overrides = BindingCollector::collect(binder.stage(), &self.overrides)?;

        for binding in base.into_ordered_bindings() {
            if overrides.contains(&binding.key) {
                debug!("绑定被覆盖: {}", binding.key);
                continue;
            }
            binder.bind(binding)?;
        }
        for binding in overrides.into_ordered_bindings() {
            binder.bind(binding)?;
        }
        Ok(())
    }
}

struct CombinedModule {
    modules: Vec<Arc<dyn Module>>,
}

impl Module for CombinedModule {
    fn name(&self) -> &str {
        "CombinedModule"
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        for module in &self.modules {
            binder.install(module.as_ref())?;
        }
        Ok(())
    }
}
