//! 注入包集成测试

mod bridge_tests;
mod builder_tests;

use crate::auto_config::AutoConfigDelegate;
use crate::exit::ExitHandler;
use crate::registry::LocatorBridgeRegistry;
use crate::{BundleBuilder, InjectionBundle};
use di_abstractions::{Binder, BinderExt, FnModule, Injector, InjectorExt, Module};
use host_abstractions::{
    Bootstrap, Configuration, DefaultLocatorSubsystem, Environment,
};
use infrastructure_common::{BoxError, Stage};
use parking_lot::Mutex;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug)]
struct AppConfig {
    name: String,
}

impl Configuration for AppConfig {}

#[derive(Debug)]
struct Greeting(String);

#[derive(Debug)]
struct HelloResource {
    greeting: Arc<Greeting>,
}

/// 记录退出码的钩子
#[derive(Debug, Default)]
struct RecordingExit {
    codes: Mutex<Vec<i32>>,
}

impl RecordingExit {
    fn codes(&self) -> Vec<i32> {
        self.codes.lock().clone()
    }
}

impl ExitHandler for RecordingExit {
    fn exit(&self, code: i32) {
        self.codes.lock().push(code);
    }
}

/// 记录调用顺序的自动配置委托
#[derive(Default)]
struct RecordingDelegate {
    events: Mutex<Vec<String>>,
}

impl RecordingDelegate {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl AutoConfigDelegate for RecordingDelegate {
    fn initialize(&self, bootstrap: &Bootstrap, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        let depth = injector.scope().depth();
        self.events
            .lock()
            .push(format!("initialize:{}:{}", bootstrap.application_name(), depth));
        Ok(())
    }

    fn run(&self, environment: &Environment, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        let resolved = injector.get::<Environment>()?;
        self.events
            .lock()
            .push(format!("run:{}:{}", environment.name(), resolved.name()));
        Ok(())
    }
}

fn app_module() -> Arc<dyn Module> {
    Arc::new(FnModule::new("app", |binder: &mut dyn Binder| {
        binder.bind_instance(Greeting("hello".to_string()))?;
        binder.bind_resource(|injector| {
            Ok(HelloResource {
                greeting: injector.get::<Greeting>()?,
            })
        })
    }))
}

fn isolated_registry() -> Arc<LocatorBridgeRegistry> {
    Arc::new(LocatorBridgeRegistry::new(Arc::new(DefaultLocatorSubsystem::new())))
}

/// 使用独立注册表与记录退出钩子的构建器
fn test_builder(exit: &Arc<RecordingExit>) -> BundleBuilder<AppConfig> {
    init_test_logger();
    let exit_handler: Arc<dyn ExitHandler> = exit.clone();
    InjectionBundle::<AppConfig>::builder()
        .add_shared_module(app_module())
        .with_exit_handler(exit_handler)
        .with_locator_registry(isolated_registry())
}

fn initialized_bundle(stage: Stage) -> InjectionBundle<AppConfig> {
    use host_abstractions::ConfiguredBundle;

    let exit = Arc::new(RecordingExit::default());
    let mut bundle = test_builder(&exit)
        .set_config_class()
        .build_with_stage(stage)
        .unwrap();
    bundle.initialize(&Bootstrap::new("test-app")).unwrap();
    bundle
}

fn app_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        name: "test-app".to_string(),
    })
}
