//! 注入包构建器

use crate::auto_config::{AutoConfig, AutoConfigDelegate};
use crate::bundle::InjectionBundle;
use crate::exit::{ExitHandler, ProcessExit};
use crate::registry::LocatorBridgeRegistry;
use crate::settings::BundleSettings;
use di_abstractions::{InjectorFactory, Module};
use di_impl::DefaultInjectorFactory;
use host_abstractions::Configuration;
use infrastructure_common::{BundleError, Stage, TypeInfo};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// 注入包构建器
///
/// 使用建造者模式收集模块与选项, 构建 [`InjectionBundle`]。
pub struct BundleBuilder<C> {
    /// 自动配置, 每次构建最多一个
    auto_config: Option<AutoConfig>,
    /// 按添加顺序排列的模块
    modules: Vec<Arc<dyn Module>>,
    /// 配置类型令牌
    config_class: Option<TypeInfo>,
    injector_factory: Arc<dyn InjectorFactory>,
    servlet_support: bool,
    exit_handler: Arc<dyn ExitHandler>,
    registry: Option<Arc<LocatorBridgeRegistry>>,
    _configuration: PhantomData<fn() -> C>,
}

impl<C: Configuration> BundleBuilder<C> {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            auto_config: None,
            modules: Vec::new(),
            config_class: None,
            injector_factory: Arc::new(DefaultInjectorFactory::new()),
            servlet_support: true,
            exit_handler: Arc::new(ProcessExit),
            registry: None,
            _configuration: PhantomData,
        }
    }

    /// 添加模块
    pub fn add_module<M: Module + 'static>(self, module: M) -> Self {
        self.add_shared_module(Arc::new(module))
    }

    /// 添加共享的模块
    pub fn add_shared_module(mut self, module: Arc<dyn Module>) -> Self {
        debug!("添加模块: {}", module.name());
        self.modules.push(module);
        self
    }

    /// 把 `C` 记录为配置类型令牌, 使具体配置类型可注入
    pub fn set_config_class(mut self) -> Self {
        self.config_class = Some(TypeInfo::of::<C>());
        self
    }

    /// 替换注入器工厂
    pub fn set_injector_factory<F: InjectorFactory + 'static>(mut self, factory: F) -> Self {
        self.injector_factory = Arc::new(factory);
        self
    }

    /// 使用默认委托启用自动配置
    pub fn enable_auto_config<I, S>(self, packages: I) -> Result<Self, BundleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_auto_config_disabled()?;
        let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
        let auto_config = AutoConfig::with_base_packages(packages)?;
        Ok(self.with_auto_config(auto_config))
    }

    /// 使用自定义委托启用自动配置
    pub fn enable_auto_config_with<I, S>(
        self,
        delegate: Arc<dyn AutoConfigDelegate>,
        packages: I,
    ) -> Result<Self, BundleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_auto_config_disabled()?;
        let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
        let auto_config = AutoConfig::new(packages, delegate)?;
        Ok(self.with_auto_config(auto_config))
    }

    fn ensure_auto_config_disabled(&self) -> Result<(), BundleError> {
        if self.auto_config.is_some() {
            return Err(BundleError::AutoConfigAlreadyEnabled);
        }
        Ok(())
    }

    fn with_auto_config(mut self, auto_config: AutoConfig) -> Self {
        info!("启用自动配置: {:?}", auto_config.packages());
        self.auto_config = Some(auto_config);
        self
    }

    /// 是否启用 servlet 支持 (默认启用)
    pub fn use_servlet_support(mut self, enabled: bool) -> Self {
        self.servlet_support = enabled;
        self
    }

    /// 替换致命错误时的退出钩子
    pub fn with_exit_handler(mut self, handler: Arc<dyn ExitHandler>) -> Self {
        self.exit_handler = handler;
        self
    }

    /// 使用指定的桥接注册表代替进程级注册表
    pub fn with_locator_registry(mut self, registry: Arc<LocatorBridgeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 应用文件与环境变量中的设置
    pub fn apply_settings(self, settings: &BundleSettings) -> Result<Self, BundleError> {
        settings.validate()?;
        let builder = self.use_servlet_support(settings.use_servlet_support);
        if settings.auto_config_enabled() {
            builder.enable_auto_config(settings.auto_config_packages.iter().cloned())
        } else {
            Ok(builder)
        }
    }

    /// 以生产阶段构建
    pub fn build(self) -> Result<InjectionBundle<C>, BundleError> {
        self.build_with_stage(Stage::Production)
    }

    /// 以指定阶段构建
    pub fn build_with_stage(self, stage: Stage) -> Result<InjectionBundle<C>, BundleError> {
        let configuration = self.into_configuration(stage)?;
        info!(
            "注入包构建完成: stage={}, 模块数量={}",
            stage,
            configuration.modules.len()
        );
        Ok(InjectionBundle::new(configuration))
    }

    fn into_configuration(self, stage: Stage) -> Result<BuildConfiguration<C>, BundleError> {
        if self.modules.is_empty() {
            return Err(BundleError::NoModules);
        }

        Ok(BuildConfiguration {
            auto_config: self.auto_config,
            modules: self.modules,
            config_class: self.config_class,
            injector_factory: self.injector_factory,
            servlet_support: self.servlet_support,
            stage,
            exit_handler: self.exit_handler,
            registry: self.registry.unwrap_or_else(LocatorBridgeRegistry::global),
            _configuration: PhantomData,
        })
    }
}

impl<C: Configuration> Default for BundleBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// 不可变的构建配置
pub struct BuildConfiguration<C> {
    auto_config: Option<AutoConfig>,
    modules: Vec<Arc<dyn Module>>,
    config_class: Option<TypeInfo>,
    injector_factory: Arc<dyn InjectorFactory>,
    servlet_support: bool,
    stage: Stage,
    exit_handler: Arc<dyn ExitHandler>,
    registry: Arc<LocatorBridgeRegistry>,
    _configuration: PhantomData<fn() -> C>,
}

impl<C> BuildConfiguration<C> {
    pub fn auto_config(&self) -> Option<&AutoConfig> {
        self.auto_config.as_ref()
    }

    /// 应用模块, 按添加顺序
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    pub fn config_class(&self) -> Option<&TypeInfo> {
        self.config_class.as_ref()
    }

    pub fn injector_factory(&self) -> &dyn InjectorFactory {
        self.injector_factory.as_ref()
    }

    pub fn servlet_support(&self) -> bool {
        self.servlet_support
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn exit_handler(&self) -> &dyn ExitHandler {
        self.exit_handler.as_ref()
    }

    pub fn registry(&self) -> Arc<LocatorBridgeRegistry> {
        Arc::clone(&self.registry)
    }
}

impl<C> fmt::Debug for BuildConfiguration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modules: Vec<&str> = self.modules.iter().map(|m| m.name()).collect();
        f.debug_struct("BuildConfiguration")
            .field("auto_config", &self.auto_config)
            .field("modules", &modules)
            .field("config_class", &self.config_class.as_ref().map(|t| t.name.as_str()))
            .field("servlet_support", &self.servlet_support)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}
