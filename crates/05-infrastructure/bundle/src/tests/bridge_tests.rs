//! 定位器桥接测试

use super::*;
use crate::bridge::{InjectorServiceLocator, LocatorName};
use host_abstractions::{
    generated_locator_name, BasicServiceLocator, ConfiguredBundle, ServiceLocator, ServiceLocatorExt,
    ServiceLocatorGenerator,
};
use infrastructure_common::{BindingKey, BundleError};

#[test]
fn test_generator_ignores_foreign_names() {
    let bundle = initialized_bundle(Stage::Development);
    let bridge = bundle.bridge().unwrap();

    assert!(bridge.create("jersey-app", None).unwrap().is_none());
    assert!(bridge.create("", None).unwrap().is_none());
}

#[test]
fn test_generator_creates_locator_for_generated_names() {
    let bundle = initialized_bundle(Stage::Development);
    let bridge = bundle.bridge().unwrap();

    let name = generated_locator_name();
    let locator = bridge.create(&name, None).unwrap().unwrap();
    assert_eq!(locator.name(), name);
    assert!(locator.parent().is_none());

    let greeting = locator.service::<Greeting>().unwrap().unwrap();
    assert_eq!(greeting.0, "hello");
    let scoped = locator.service::<LocatorName>().unwrap().unwrap();
    assert_eq!(scoped.as_str(), name);
    assert!(locator.service::<String>().unwrap().is_none());
}

#[test]
fn test_each_call_derives_a_new_child() {
    let bundle = initialized_bundle(Stage::Development);
    let bridge = bundle.bridge().unwrap();
    let name = generated_locator_name();

    let first = bridge.new_child_injector(&name, None).unwrap();
    let second = bridge.new_child_injector(&name, None).unwrap();
    assert_ne!(first.scope().id, second.scope().id);

    let locator = first.get::<Arc<dyn ServiceLocator>>().unwrap();
    let again = first.get::<Arc<dyn ServiceLocator>>().unwrap();
    assert!(!Arc::ptr_eq(&*locator, &*again));
}

#[test]
fn test_locator_falls_back_to_parent() {
    let bundle = initialized_bundle(Stage::Development);
    let bridge = bundle.bridge().unwrap();

    let parent = Arc::new(BasicServiceLocator::new("host", None));
    parent.add_service(99u64);
    let parent: Arc<dyn ServiceLocator> = parent;

    let locator = bridge
        .create(&generated_locator_name(), Some(Arc::clone(&parent)))
        .unwrap()
        .unwrap();
    assert_eq!(*locator.service::<u64>().unwrap().unwrap(), 99);
    assert_eq!(locator.parent().unwrap().name(), "host");
}

#[test]
fn test_subsystem_routes_through_installed_bridge() {
    let registry = isolated_registry();
    let exit = Arc::new(RecordingExit::default());
    let mut bundle = test_builder(&exit)
        .with_locator_registry(Arc::clone(&registry))
        .build_with_stage(Stage::Development)
        .unwrap();
    bundle.initialize(&Bootstrap::new("test-app")).unwrap();

    let subsystem = registry.subsystem();
    let generated = subsystem.create(&generated_locator_name(), None).unwrap();
    assert!(generated.service::<Greeting>().unwrap().is_some());

    let foreign = subsystem.create("host-owned", None).unwrap();
    assert_eq!(foreign.name(), "host-owned");
    assert!(foreign.service::<Greeting>().unwrap().is_none());
}

#[test]
fn test_injector_service_locator_resolves_keys() {
    let bundle = initialized_bundle(Stage::Development);
    let child = bundle.get_injector().unwrap();
    let locator = InjectorServiceLocator::new("direct", Arc::clone(&child), None);

    let service = locator
        .get_service(&BindingKey::of::<Greeting>())
        .unwrap()
        .unwrap();
    assert!(service.downcast::<Greeting>().is_ok());
    assert!(locator
        .get_service(&BindingKey::named::<Greeting>("missing"))
        .unwrap()
        .is_none());
    assert_eq!(locator.injector().scope().id, child.scope().id);
}

#[test]
fn test_registry_rejects_second_install() {
    let registry = isolated_registry();
    let bundle = initialized_bundle(Stage::Development);
    let bridge = bundle.bridge().unwrap();

    registry.install(Arc::clone(&bridge)).unwrap();
    assert!(matches!(
        registry.install(bridge),
        Err(BundleError::BridgeAlreadyInstalled)
    ));
    assert!(registry.bridge().is_some());
}
