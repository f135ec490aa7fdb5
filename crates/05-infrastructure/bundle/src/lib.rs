//! # 注入包
//!
//! 把依赖注入容器接入宿主 Web 框架请求管道的 bundle。HTTP 资源与过滤器由注入器
//! 创建, 而不是由框架自行实例化。
//!
//! ## 主要功能
//!
//! - **注入包构建器**: 收集模块、自动配置与选项
//! - **两阶段生命周期**: `initialize` 创建根注入器并安装定位器桥接, `run` 接入服务器
//! - **定位器桥接**: 为每个生成的服务定位器派生独立的子注入器
//! - **环境模块**: 把宿主配置与运行时环境暴露为可注入值
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{Binder, BinderExt, FnModule};
//! use host_abstractions::{Bootstrap, ConfiguredBundle, DefaultConfiguration, Environment};
//! use injection_bundle::InjectionBundle;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bundle = InjectionBundle::<DefaultConfiguration>::builder()
//!         .add_module(FnModule::new("app", |binder: &mut dyn Binder| {
//!             binder.bind_instance(42u32)
//!         }))
//!         .build()?;
//!
//!     bundle.initialize(&Bootstrap::new("demo"))?;
//!     bundle.run(Arc::new(DefaultConfiguration), Arc::new(Environment::new("demo")))?;
//!
//!     let injector = bundle.get_injector()?;
//!     assert!(injector.has_binding(&infrastructure_common::BindingKey::of::<u32>()));
//!     Ok(())
//! }
//! ```

pub mod auto_config;
pub mod bridge;
pub mod builder;
pub mod bundle;
pub mod environment;
pub mod exit;
pub mod jersey;
pub mod logging;
pub mod registry;
pub mod servlet;
pub mod settings;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use auto_config::{AutoConfig, AutoConfigDelegate, BasePackageAutoConfig};
pub use bridge::{InjectorServiceLocator, LocatorBridge, LocatorName, LocatorScopeModule};
pub use builder::{BuildConfiguration, BundleBuilder};
pub use bundle::InjectionBundle;
pub use environment::{EnvironmentHandle, EnvironmentModule};
pub use exit::{ExitHandler, ProcessExit};
pub use logging::{init_logging, LoggingConfig};
pub use registry::LocatorBridgeRegistry;
pub use servlet::{InjectionFilter, ServletIntegration, ServletSupportModule, INJECTION_FILTER_NAME};
pub use settings::BundleSettings;

// 重新导出错误类型
pub use infrastructure_common::BundleError;
