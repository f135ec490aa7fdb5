//! 服务定位器子系统
//!
//! 宿主请求管道通过服务定位器获取请求处理组件。定位器由子系统按名称生成,
//! 子系统允许安装一个生成器来接管生成过程。

use infrastructure_common::{BindingKey, DependencyError};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 子系统生成的定位器名称前缀
pub const GENERATED_LOCATOR_PREFIX: &str = "__Generated_Locator_";

static LOCATOR_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// 生成新的定位器名称
pub fn generated_locator_name() -> String {
    let sequence = LOCATOR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", GENERATED_LOCATOR_PREFIX, sequence)
}

/// 名称是否符合生成定位器的命名约定
pub fn is_generated_locator_name(name: &str) -> bool {
    name.starts_with(GENERATED_LOCATOR_PREFIX)
}

/// 类型擦除后的服务实例
pub type Service = Arc<dyn Any + Send + Sync>;

/// 服务定位器 trait
pub trait ServiceLocator: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn parent(&self) -> Option<Arc<dyn ServiceLocator>>;

    /// 查找服务, 未知的键返回 `Ok(None)`
    fn get_service(&self, key: &BindingKey) -> Result<Option<Service>, DependencyError>;
}

/// 服务定位器便捷方法
pub trait ServiceLocatorExt: ServiceLocator {
    /// 按类型查找服务
    fn service<T>(&self) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let key = BindingKey::of::<T>();
        match self.get_service(&key)? {
            Some(service) => service
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DependencyError::TypeMismatch {
                    type_name: key.to_string(),
                }),
            None => Ok(None),
        }
    }
}

impl<L: ServiceLocator + ?Sized> ServiceLocatorExt for L {}

/// 定位器生成器 trait
///
/// 对不属于自己的名称返回 `Ok(None)`, 交给子系统的默认处理。
pub trait ServiceLocatorGenerator: Send + Sync {
    fn create(
        &self,
        name: &str,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Result<Option<Arc<dyn ServiceLocator>>, DependencyError>;
}

/// 定位器生成子系统的扩展点
pub trait LocatorGeneratorSubsystem: Send + Sync {
    /// 安装生成器, 替换之前安装的生成器
    fn install(&self, generator: Arc<dyn ServiceLocatorGenerator>);

    fn is_installed(&self) -> bool;

    /// 生成定位器: 先询问已安装的生成器, 否则回退到默认定位器
    fn create(
        &self,
        name: &str,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Result<Arc<dyn ServiceLocator>, DependencyError>;
}

/// 默认的定位器生成子系统
#[derive(Default)]
pub struct DefaultLocatorSubsystem {
    generator: RwLock<Option<Arc<dyn ServiceLocatorGenerator>>>,
}

impl DefaultLocatorSubsystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocatorGeneratorSubsystem for DefaultLocatorSubsystem {
    fn install(&self, generator: Arc<dyn ServiceLocatorGenerator>) {
        let mut slot = self.generator.write();
        if slot.is_some() {
            warn!("替换已安装的定位器生成器");
        }
        *slot = Some(generator);
        info!("定位器生成器已安装");
    }

    fn is_installed(&self) -> bool {
        self.generator.read().is_some()
    }

    fn create(
        &self,
        name: &str,
        parent: Option<Arc<dyn ServiceLocator>>,
    ) -> Result<Arc<dyn ServiceLocator>, DependencyError> {
        let generator = self.generator.read().clone();
        if let Some(generator) = generator {
            if let Some(locator) = generator.create(name, parent.clone())? {
                return Ok(locator);
            }
        }

        debug!("使用默认定位器: {}", name);
        let locator: Arc<dyn ServiceLocator> = Arc::new(BasicServiceLocator::new(name, parent));
        Ok(locator)
    }
}

static GLOBAL_SUBSYSTEM: Lazy<Arc<DefaultLocatorSubsystem>> =
    Lazy::new(|| Arc::new(DefaultLocatorSubsystem::new()));

/// 获取进程级的定位器生成子系统
pub fn global_locator_subsystem() -> Arc<dyn LocatorGeneratorSubsystem> {
    let subsystem: Arc<dyn LocatorGeneratorSubsystem> = GLOBAL_SUBSYSTEM.clone();
    subsystem
}

/// 默认定位器
///
/// 只包含显式添加的服务, 找不到时委托父定位器。
#[derive(Debug)]
pub struct BasicServiceLocator {
    name: String,
    parent: Option<Arc<dyn ServiceLocator>>,
    services: RwLock<HashMap<BindingKey, Service>>,
}

impl BasicServiceLocator {
    pub fn new(name: impl Into<String>, parent: Option<Arc<dyn ServiceLocator>>) -> Self {
        Self {
            name: name.into(),
            parent,
            services: RwLock::new(HashMap::new()),
        }
    }

    /// 添加服务
    pub fn add_service<T>(&self, service: T)
    where
        T: Send + Sync + 'static,
    {
        let service: Service = Arc::new(service);
        self.services.write().insert(BindingKey::of::<T>(), service);
    }
}

impl ServiceLocator for BasicServiceLocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn ServiceLocator>> {
        self.parent.clone()
    }

    fn get_service(&self, key: &BindingKey) -> Result<Option<Service>, DependencyError> {
        if let Some(service) = self.services.read().get(key) {
            return Ok(Some(Arc::clone(service)));
        }
        match &self.parent {
            Some(parent) => parent.get_service(key),
            None => Ok(None),
        }
    }
}
