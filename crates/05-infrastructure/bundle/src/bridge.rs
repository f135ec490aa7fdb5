//! 服务定位器桥接
//!
//! 宿主的定位器子系统每生成一个定位器, 桥接就从根注入器派生一个子注入器,
//! 并由子注入器提供该定位器。

use crate::servlet::ServletIntegration;
use di_abstractions::{Binder, BinderExt, Injector, InjectorExt, Module};
use host_abstractions::{
    is_generated_locator_name, Service, ServiceLocator, ServiceLocatorGenerator,
};
use infrastructure_common::{BindingKey, DependencyError, Lifetime};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 子注入器所服务的定位器名称
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatorName(pub String);

impl LocatorName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 子注入器上的定位器作用域模块
pub struct LocatorScopeModule {
    name: String,
    servlet_support: bool,
    parent: Option<Arc<dyn ServiceLocator>>,
}

impl LocatorScopeModule {
    pub fn new(
        name: impl Into<String>,
        servlet_support: bool,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Self {
        Self {
            name: name.into(),
            servlet_support,
            parent,
        }
    }
}

impl Module for LocatorScopeModule {
    fn name(&self) -> &str {
        "LocatorScopeModule"
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        binder.bind_instance(LocatorName(self.name.clone()))?;
        binder.bind_instance(ServletIntegration {
            enabled: self.servlet_support,
        })?;

        let name = self.name.clone();
        let parent = self.parent.clone();
        binder.bind_factory::<Arc<dyn ServiceLocator>, _>(Lifetime::Transient, move |injector| {
            let locator: Arc<dyn ServiceLocator> = Arc::new(InjectorServiceLocator::new(
                name.clone(),
                injector.handle()?,
                parent.clone(),
            ));
            Ok(locator)
        })
    }
}

/// 由注入器支撑的服务定位器
///
/// 先在注入器层级中查找, 找不到时委托父定位器。
pub struct InjectorServiceLocator {
    name: String,
    injector: Arc<dyn Injector>,
    parent: Option<Arc<dyn ServiceLocator>>,
}

impl InjectorServiceLocator {
    pub fn new(
        name: impl Into<String>,
        injector: Arc<dyn Injector>,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Self {
        Self {
            name: name.into(),
            injector,
            parent,
        }
    }

    /// 支撑该定位器的注入器
    pub fn injector(&self) -> Arc<dyn Injector> {
        Arc::clone(&self.injector)
    }
}

impl ServiceLocator for InjectorServiceLocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn ServiceLocator>> {
        self.parent.clone()
    }

    fn get_service(&self, key: &BindingKey) -> Result<Option<Service>, DependencyError> {
        if self.injector.has_binding(key) {
            return self.injector.get_instance(key).map(Some);
        }
        match &self.parent {
            Some(parent) => parent.get_service(key),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for InjectorServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorServiceLocator")
            .field("name", &self.name)
            .field("scope", &self.injector.scope().name)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// 定位器生成器
///
/// 只接管子系统生成的定位器名称, 每次调用派生一个新的子注入器, 不做缓存。
pub struct LocatorBridge {
    root: Arc<dyn Injector>,
    servlet_support: bool,
}

impl LocatorBridge {
    pub fn new(root: Arc<dyn Injector>, servlet_support: bool) -> Self {
        Self {
            root,
            servlet_support,
        }
    }

    pub fn root(&self) -> Arc<dyn Injector> {
        Arc::clone(&self.root)
    }

    /// 为指定定位器派生子注入器
    pub fn new_child_injector(
        &self,
        name: &str,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Result<Arc<dyn Injector>, DependencyError> {
        let module: Arc<dyn Module> =
            Arc::new(LocatorScopeModule::new(name, self.servlet_support, parent));
        let child = self.root.create_child_injector(vec![module])?;
        debug!("为定位器 {} 派生子注入器: {}", name, child.scope().id);
        Ok(child)
    }
}

impl ServiceLocatorGenerator for LocatorBridge {
    fn create(
        &self,
        name: &str,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Result<Option<Arc<dyn ServiceLocator>>, DependencyError> {
        if !is_generated_locator_name(name) {
            debug!("忽略非生成的定位器: {}", name);
            return Ok(None);
        }

        let child = self.new_child_injector(name, parent)?;
        let locator = child.get::<Arc<dyn ServiceLocator>>()?;
        Ok(Some(Arc::clone(&*locator)))
    }
}

impl fmt::Debug for LocatorBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorBridge")
            .field("root", &self.root.scope().name)
            .field("servlet_support", &self.servlet_support)
            .finish()
    }
}
