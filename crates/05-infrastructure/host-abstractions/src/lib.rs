//! # Host Abstractions
//!
//! 宿主 Web 框架对注入包暴露的窄接口。
//!
//! ## 核心接口
//!
//! - [`ConfiguredBundle`] - 两阶段生命周期钩子
//! - [`Bootstrap`] / [`Environment`] - 启动上下文与运行时环境
//! - [`LocatorGeneratorSubsystem`] - 服务定位器生成扩展点

pub mod bootstrap;
pub mod bundle;
pub mod configuration;
pub mod environment;
pub mod locator;

pub use bootstrap::*;
pub use bundle::*;
pub use configuration::*;
pub use environment::*;
pub use locator::*;
