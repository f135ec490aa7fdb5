//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义模块、绑定与注入器的核心接口。
//!
//! ## 核心接口
//!
//! - [`Module`] / [`Binder`] - 绑定配置单元
//! - [`Injector`] - 注入器 (支持派生子注入器)
//! - [`InjectorFactory`] - 根注入器创建策略

pub mod binding;
pub mod factory;
pub mod injector;
pub mod module;

pub use binding::*;
pub use factory::*;
pub use injector::*;
pub use module::*;
