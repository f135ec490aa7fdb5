//! 注入器实现

use crate::binder::BindingCollector;
use dashmap::DashMap;
use di_abstractions::{Binding, Injector, Instance, Module};
use infrastructure_common::{BindingKey, DependencyError, Lifetime, Scope, Stage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info};
use uuid::Uuid;

thread_local! {
    /// 当前线程上正在解析的 (作用域, 绑定键), 用于检测循环依赖
    ///
    /// 同一个键在不同作用域中是不同的条目, 子注入器可以用同一个键装饰父绑定。
    static RESOLUTION_STACK: RefCell<Vec<(Uuid, BindingKey)>> = RefCell::new(Vec::new());
}

/// 解析栈条目, 离开作用域时出栈 (包括提供者 panic 的情况)
struct ResolutionGuard;

impl ResolutionGuard {
    /// 入栈, 条目已在栈中时返回依赖链
    fn enter(scope: Uuid, key: &BindingKey) -> Result<Self, DependencyError> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(id, k)| *id == scope && k == key) {
                let mut chain: Vec<String> = stack.iter().map(|(_, k)| k.to_string()).collect();
                chain.push(key.to_string());
                return Err(DependencyError::CircularDependency {
                    dependency_chain: chain.join(" -> "),
                });
            }
            stack.push((scope, key.clone()));
            Ok(Self)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// 具体的注入器实现
///
/// 绑定表在创建后不再变化, 单例缓存使用 [`DashMap`] 支持并发解析。
pub struct InjectorImpl {
    scope: Scope,
    stage: Stage,
    parent: Option<Arc<dyn Injector>>,
    bindings: HashMap<BindingKey, Binding>,
    order: Vec<BindingKey>,
    singletons: DashMap<BindingKey, Instance>,
    this: Weak<InjectorImpl>,
}

impl InjectorImpl {
    /// 创建根注入器
    pub fn create(stage: Stage, modules: &[Arc<dyn Module>]) -> Result<Arc<Self>, DependencyError> {
        let injector = Self::build(stage, None, Scope::root(), modules)?;
        info!(
            "根注入器创建完成: stage={}, 绑定数量={}",
            stage,
            injector.order.len()
        );
        Ok(injector)
    }

    fn build(
        stage: Stage,
        parent: Option<Arc<dyn Injector>>,
        scope: Scope,
        modules: &[Arc<dyn Module>],
    ) -> Result<Arc<Self>, DependencyError> {
        let (bindings, order) = BindingCollector::collect(stage, modules)?.into_parts();

        let injector = Arc::new_cyclic(|this| Self {
            scope,
            stage,
            parent,
            bindings,
            order,
            singletons: DashMap::new(),
            this: this.clone(),
        });

        if stage.eager_singletons() {
            injector.instantiate_eager_singletons()?;
        }

        Ok(injector)
    }

    /// 生产阶段立即创建全部单例, 汇总所有失败
    fn instantiate_eager_singletons(&self) -> Result<(), DependencyError> {
        let mut errors = Vec::new();

        for key in &self.order {
            let Some(binding) = self.bindings.get(key) else {
                continue;
            };
            if binding.lifetime != Lifetime::Singleton {
                continue;
            }
            if let Err(e) = self.provide(binding) {
                errors.push(format!("{}: {}", key, e));
            }
        }

        if errors.is_empty() {
            debug!("作用域 {} 的单例已全部创建", self.scope.name);
            Ok(())
        } else {
            Err(DependencyError::InjectorCreationFailed { errors })
        }
    }

    fn provide(&self, binding: &Binding) -> Result<Instance, DependencyError> {
        match binding.lifetime {
            Lifetime::Singleton => {
                if let Some(existing) = self.singletons.get(&binding.key) {
                    return Ok(Arc::clone(existing.value()));
                }
                // 并发创建时保留先写入的实例
                let created = self.invoke(binding)?;
                let entry = self.singletons.entry(binding.key.clone()).or_insert(created);
                Ok(Arc::clone(entry.value()))
            }
            Lifetime::Transient => self.invoke(binding),
        }
    }

    fn invoke(&self, binding: &Binding) -> Result<Instance, DependencyError> {
        let _guard = ResolutionGuard::enter(self.scope.id, &binding.key)?;
        (binding.provider)(self)
    }

    /// 已缓存的单例数量
    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }
}

impl Injector for InjectorImpl {
    fn get_instance(&self, key: &BindingKey) -> Result<Instance, DependencyError> {
        if let Some(binding) = self.bindings.get(key) {
            return self.provide(binding);
        }
        match &self.parent {
            Some(parent) => parent.get_instance(key),
            None => Err(DependencyError::ComponentNotRegistered {
                type_name: key.to_string(),
            }),
        }
    }

    fn has_binding(&self, key: &BindingKey) -> bool {
        self.bindings.contains_key(key)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.has_binding(key))
    }

    fn bindings(&self) -> Vec<Binding> {
        self.order
            .iter()
            .filter_map(|key| self.bindings.get(key).cloned())
            .collect()
    }

    fn parent(&self) -> Option<Arc<dyn Injector>> {
        self.parent.clone()
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn handle(&self) -> Result<Arc<dyn Injector>, DependencyError> {
        let this = self.this.upgrade().ok_or(DependencyError::InjectorReleased)?;
        let handle: Arc<dyn Injector> = this;
        Ok(handle)
    }

    fn create_child_injector(
        &self,
        modules: Vec<Arc<dyn Module>>,
    ) -> Result<Arc<dyn Injector>, DependencyError> {
        let parent = self.handle()?;
        let child = Self::build(self.stage, Some(parent), self.scope.child("child"), &modules)?;
        debug!(
            "派生子注入器: scope={}, id={}, 绑定数量={}",
            child.scope.name,
            child.scope.id,
            child.order.len()
        );
        let child: Arc<dyn Injector> = child;
        Ok(child)
    }
}

impl fmt::Debug for InjectorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorImpl")
            .field("scope", &self.scope)
            .field("stage", &self.stage)
            .field("bindings", &self.order)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
