//! 注入包生命周期
//!
//! `initialize` 创建根注入器并安装定位器桥接, `run` 把注入器接入运行中的服务器。
//! 状态只能按 `Created -> Initialized -> Running` 推进。

use crate::bridge::LocatorBridge;
use crate::builder::{BuildConfiguration, BundleBuilder};
use crate::environment::{EnvironmentHandle, EnvironmentModule};
use crate::jersey;
use crate::servlet::ServletSupportModule;
use di_abstractions::{Injector, Module};
use host_abstractions::{generated_locator_name, Bootstrap, Configuration, ConfiguredBundle, Environment};
use infrastructure_common::{error_chain, BundleError, BundleState, Stage};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 把注入器接入宿主请求管道的 bundle
pub struct InjectionBundle<C: Configuration> {
    config: BuildConfiguration<C>,
    state: BundleState,
    environment: Arc<EnvironmentHandle<C>>,
    root: Option<Arc<dyn Injector>>,
    bridge: Option<Arc<LocatorBridge>>,
}

impl<C: Configuration> InjectionBundle<C> {
    /// 创建构建器
    pub fn builder() -> BundleBuilder<C> {
        BundleBuilder::new()
    }

    pub fn new(config: BuildConfiguration<C>) -> Self {
        Self {
            config,
            state: BundleState::Created,
            environment: Arc::new(EnvironmentHandle::new()),
            root: None,
            bridge: None,
        }
    }

    pub fn state(&self) -> BundleState {
        self.state
    }

    pub fn stage(&self) -> Stage {
        self.config.stage()
    }

    pub fn configuration(&self) -> &BuildConfiguration<C> {
        &self.config
    }

    /// 宿主环境数据句柄
    pub fn environment_handle(&self) -> Arc<EnvironmentHandle<C>> {
        Arc::clone(&self.environment)
    }

    /// 根注入器
    pub fn root_injector(&self) -> Result<Arc<dyn Injector>, BundleError> {
        self.root.clone().ok_or(BundleError::NotInitialized)
    }

    /// 已安装的定位器桥接
    pub fn bridge(&self) -> Option<Arc<LocatorBridge>> {
        self.bridge.clone()
    }

    /// 派生新的子注入器
    ///
    /// 每次调用都使用新生成的定位器名称创建一个独立的子注入器。
    pub fn get_injector(&self) -> Result<Arc<dyn Injector>, BundleError> {
        let bridge = self.bridge.as_ref().ok_or(BundleError::NotInitialized)?;
        let child = bridge.new_child_injector(&generated_locator_name(), None)?;
        Ok(child)
    }

    fn ensure_state(&self, expected: BundleState) -> Result<(), BundleError> {
        if self.state != expected {
            return Err(BundleError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    /// 根注入器的模块: 应用模块, 环境模块, 以及可选的 servlet 支持模块
    fn root_modules(&self) -> Vec<Arc<dyn Module>> {
        let mut modules = self.config.modules().to_vec();
        modules.push(Arc::new(EnvironmentModule::new(
            Arc::clone(&self.environment),
            self.config.config_class().cloned(),
        )));
        if self.config.servlet_support() {
            modules.push(Arc::new(ServletSupportModule));
        }
        modules
    }

    fn create_root_injector(&self) -> Result<Arc<dyn Injector>, BundleError> {
        let modules = self.root_modules();
        debug!("创建根注入器: {} 个模块", modules.len());

        match self.config.injector_factory().create(self.stage(), modules) {
            Ok(root) => Ok(root),
            Err(e) => {
                error!("创建根注入器时发生异常, 程序退出");
                for (depth, cause) in error_chain(&e).iter().enumerate() {
                    error!("  [{}] {}", depth, cause);
                }
                self.config.exit_handler().exit(1);
                Err(e.into())
            }
        }
    }
}

impl<C: Configuration> ConfiguredBundle<C> for InjectionBundle<C> {
    fn initialize(&mut self, bootstrap: &Bootstrap) -> Result<(), BundleError> {
        self.ensure_state(BundleState::Created)?;
        info!(
            "初始化注入包: 应用={}, stage={}",
            bootstrap.application_name(),
            self.stage()
        );

        let root = self.create_root_injector()?;
        let bridge = Arc::new(LocatorBridge::new(
            Arc::clone(&root),
            self.config.servlet_support(),
        ));
        self.config.registry().install(Arc::clone(&bridge))?;

        self.root = Some(Arc::clone(&root));
        self.bridge = Some(Arc::clone(&bridge));
        self.state = BundleState::Initialized;

        if let Some(auto_config) = self.config.auto_config() {
            let child = bridge.new_child_injector(&generated_locator_name(), None)?;
            auto_config.initialize(bootstrap, child)?;
        }

        info!("注入包初始化完成");
        Ok(())
    }

    fn run(&mut self, configuration: Arc<C>, environment: Arc<Environment>) -> Result<(), BundleError> {
        self.ensure_state(BundleState::Initialized)?;
        let root = self.root_injector()?;
        info!("注入包接入服务器: {}", environment.name());

        jersey::register_managed_resources(root.as_ref(), environment.jersey());
        jersey::register_request_filter(&environment);
        self.environment
            .set(configuration, Arc::clone(&environment))?;
        self.state = BundleState::Running;

        if let Some(auto_config) = self.config.auto_config() {
            auto_config.run(&environment, root)?;
        }

        info!("注入包已运行");
        Ok(())
    }
}

impl<C: Configuration> fmt::Debug for InjectionBundle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionBundle")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
