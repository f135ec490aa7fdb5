//! # 依赖注入具体实现
//!
//! 提供具体的注入器、绑定收集器与默认注入器工厂。

pub mod binder;
pub mod factory;
pub mod injector;
pub mod modules;

pub use binder::BindingCollector;
pub use factory::DefaultInjectorFactory;
pub use injector::InjectorImpl;
pub use modules::Modules;
