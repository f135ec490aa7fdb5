//! 绑定收集器

use di_abstractions::{Binder, Binding, Module};
use infrastructure_common::{BindingKey, DependencyError, Stage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 绑定收集器
///
/// 依次执行模块配置, 记录绑定的声明顺序。同一注入器内重复的绑定键视为冲突。
#[derive(Debug)]
pub struct BindingCollector {
    stage: Stage,
    bindings: HashMap<BindingKey, Binding>,
    order: Vec<BindingKey>,
    /// 正在配置的模块栈
    modules: Vec<String>,
}

impl BindingCollector {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            bindings: HashMap::new(),
            order: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// 配置全部模块并汇总错误
    pub fn collect(stage: Stage, modules: &[Arc<dyn Module>]) -> Result<Self, DependencyError> {
        let mut collector = Self::new(stage);
        let mut errors = Vec::new();

        for module in modules {
            if let Err(e) = collector.install(module.as_ref()) {
                errors.push(format!("{}: {}", module.name(), e));
            }
        }

        if errors.is_empty() {
            Ok(collector)
        } else {
            Err(DependencyError::InjectorCreationFailed { errors })
        }
    }

    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按声明顺序取出绑定
    pub fn into_ordered_bindings(mut self) -> Vec<Binding> {
        self.order
            .iter()
            .filter_map(|key| self.bindings.remove(key))
            .collect()
    }

    pub(crate) fn into_parts(self) -> (HashMap<BindingKey, Binding>, Vec<BindingKey>) {
        (self.bindings, self.order)
    }

    fn current_module(&self) -> String {
        self.modules.last().cloned().unwrap_or_else(|| "<root>".to_string())
    }
}

impl Binder for BindingCollector {
    fn bind(&mut self, binding: Binding) -> Result<(), DependencyError> {
        let module = self.current_module();
        if let Some(existing) = self.bindings.get(&binding.key) {
            return Err(DependencyError::DuplicateBinding {
                type_name: binding.key.to_string(),
                module: format!("{} (已由 {} 绑定)", module, existing.source),
            });
        }

        debug!("收集绑定: {} <- {}", binding.key, module);
        let binding = if binding.source.is_empty() {
            binding.with_source(module)
        } else {
            binding
        };
        self.order.push(binding.key.clone());
        self.bindings.insert(binding.key.clone(), binding);
        Ok(())
    }

    fn install(&mut self, module: &dyn Module) -> Result<(), DependencyError> {
        self.modules.push(module.name().to_string());
        let result = module.configure(self);
        self.modules.pop();
        result
    }

    fn stage(&self) -> Stage {
        self.stage
    }
}
