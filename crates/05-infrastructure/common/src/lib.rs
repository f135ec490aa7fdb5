//! # Infrastructure Common
//!
//! 注入包各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`DependencyError`] / [`BundleError`] - 错误分类
//! - [`Stage`] - 注入器构建阶段
//! - [`BundleState`] - 注入包生命周期状态
//! - [`BindingKey`] - 绑定键

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
