//! 自动配置
//!
//! 自动配置是外部协作者: 注入包只负责在两个生命周期阶段各调用一次委托。

use di_abstractions::{Injector, InjectorExt};
use host_abstractions::{Bootstrap, Environment, RegisteredComponent};
use infrastructure_common::{BindingKey, BoxError, BundleError};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 自动配置委托
pub trait AutoConfigDelegate: Send + Sync {
    /// `initialize` 阶段调用, 注入器是根注入器派生的子注入器
    fn initialize(&self, bootstrap: &Bootstrap, injector: Arc<dyn Injector>) -> Result<(), BoxError>;

    /// `run` 阶段调用, 注入器是根注入器
    fn run(&self, environment: &Environment, injector: Arc<dyn Injector>) -> Result<(), BoxError>;
}

/// 已启用的自动配置
#[derive(Clone)]
pub struct AutoConfig {
    packages: Vec<String>,
    delegate: Arc<dyn AutoConfigDelegate>,
}

impl AutoConfig {
    /// 校验基础包并创建自动配置
    pub fn new(
        packages: Vec<String>,
        delegate: Arc<dyn AutoConfigDelegate>,
    ) -> Result<Self, BundleError> {
        validate_packages(&packages)?;
        Ok(Self { packages, delegate })
    }

    /// 使用默认委托
    pub fn with_base_packages(packages: Vec<String>) -> Result<Self, BundleError> {
        validate_packages(&packages)?;
        let delegate = Arc::new(BasePackageAutoConfig::new(packages.clone()));
        Ok(Self { packages, delegate })
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub(crate) fn initialize(
        &self,
        bootstrap: &Bootstrap,
        injector: Arc<dyn Injector>,
    ) -> Result<(), BundleError> {
        debug!("自动配置 initialize: {:?}", self.packages);
        self.delegate
            .initialize(bootstrap, injector)
            .map_err(|source| BundleError::AutoConfigFailed {
                phase: "initialize",
                source,
            })
    }

    pub(crate) fn run(
        &self,
        environment: &Environment,
        injector: Arc<dyn Injector>,
    ) -> Result<(), BundleError> {
        debug!("自动配置 run: {:?}", self.packages);
        self.delegate
            .run(environment, injector)
            .map_err(|source| BundleError::AutoConfigFailed { phase: "run", source })
    }
}

impl fmt::Debug for AutoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoConfig")
            .field("packages", &self.packages)
            .finish_non_exhaustive()
    }
}

fn validate_packages(packages: &[String]) -> Result<(), BundleError> {
    if packages.is_empty() {
        return Err(BundleError::EmptyBasePackages);
    }
    if let Some(invalid) = packages.iter().find(|p| p.trim().is_empty()) {
        return Err(BundleError::InvalidBasePackage {
            package: invalid.clone(),
        });
    }
    Ok(())
}

/// 按基础包筛选绑定的默认自动配置
///
/// `initialize` 记录位于基础包内的绑定, `run` 把其中的 HTTP 资源与提供者注册到路由。
#[derive(Debug, Default)]
pub struct BasePackageAutoConfig {
    packages: Vec<String>,
    discovered: RwLock<Vec<BindingKey>>,
}

impl BasePackageAutoConfig {
    pub fn new(packages: Vec<String>) -> Self {
        Self {
            packages,
            discovered: RwLock::new(Vec::new()),
        }
    }

    /// 绑定键是否位于任一基础包内
    pub fn matches(&self, key: &BindingKey) -> bool {
        self.packages
            .iter()
            .any(|package| key.type_info.is_within(package))
    }

    /// `initialize` 阶段发现的绑定
    pub fn discovered(&self) -> Vec<BindingKey> {
        self.discovered.read().clone()
    }
}

impl AutoConfigDelegate for BasePackageAutoConfig {
    fn initialize(&self, _bootstrap: &Bootstrap, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        let found: Vec<BindingKey> = injector
            .all_bindings()
            .into_iter()
            .map(|binding| binding.key)
            .filter(|key| self.matches(key))
            .collect();

        for key in &found {
            debug!("发现基础包内的绑定: {}", key);
        }
        info!("自动配置发现 {} 个绑定", found.len());
        *self.discovered.write() = found;
        Ok(())
    }

    fn run(&self, environment: &Environment, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        let jersey = environment.jersey();
        let mut registered = 0;
        for binding in injector.all_bindings() {
            if binding.role.is_http_managed() && self.matches(&binding.key) {
                if jersey.register(RegisteredComponent {
                    key: binding.key,
                    role: binding.role,
                }) {
                    registered += 1;
                }
            }
        }
        info!("自动配置注册了 {} 个组件", registered);
        Ok(())
    }
}
