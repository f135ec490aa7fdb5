//! 定位器桥接注册表
//!
//! 定位器子系统是进程级的, 因此桥接只能安装一次。

use crate::bridge::LocatorBridge;
use host_abstractions::{global_locator_subsystem, LocatorGeneratorSubsystem};
use infrastructure_common::BundleError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::info;

static GLOBAL_REGISTRY: Lazy<Arc<LocatorBridgeRegistry>> =
    Lazy::new(|| Arc::new(LocatorBridgeRegistry::new(global_locator_subsystem())));

/// 定位器桥接注册表
pub struct LocatorBridgeRegistry {
    subsystem: Arc<dyn LocatorGeneratorSubsystem>,
    bridge: RwLock<Option<Arc<LocatorBridge>>>,
}

impl LocatorBridgeRegistry {
    /// 绑定到指定子系统的注册表
    pub fn new(subsystem: Arc<dyn LocatorGeneratorSubsystem>) -> Self {
        Self {
            subsystem,
            bridge: RwLock::new(None),
        }
    }

    /// 绑定到进程级子系统的注册表
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// 安装桥接
    pub fn install(&self, bridge: Arc<LocatorBridge>) -> Result<(), BundleError> {
        let mut slot = self.bridge.write();
        if slot.is_some() {
            return Err(BundleError::BridgeAlreadyInstalled);
        }
        self.subsystem.install(bridge.clone());
        *slot = Some(bridge);
        info!("定位器桥接已安装");
        Ok(())
    }

    pub fn bridge(&self) -> Option<Arc<LocatorBridge>> {
        self.bridge.read().clone()
    }

    pub fn is_installed(&self) -> bool {
        self.bridge.read().is_some()
    }

    pub fn subsystem(&self) -> Arc<dyn LocatorGeneratorSubsystem> {
        Arc::clone(&self.subsystem)
    }
}

impl fmt::Debug for LocatorBridgeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorBridgeRegistry")
            .field("bridge", &*self.bridge.read())
            .field("subsystem_installed", &self.subsystem.is_installed())
            .finish()
    }
}
