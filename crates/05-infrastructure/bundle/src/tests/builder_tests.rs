//! 构建器测试

use super::*;
use crate::settings::BundleSettings;
use infrastructure_common::{BundleError, BundleState};

#[test]
fn test_build_without_modules_fails() {
    let result = InjectionBundle::<AppConfig>::builder()
        .with_locator_registry(isolated_registry())
        .build();
    assert!(matches!(result, Err(BundleError::NoModules)));
}

#[test]
fn test_build_defaults() {
    let exit = Arc::new(RecordingExit::default());
    let bundle = test_builder(&exit).build().unwrap();

    assert_eq!(bundle.state(), BundleState::Created);
    assert_eq!(bundle.stage(), Stage::Production);
    let config = bundle.configuration();
    assert!(config.servlet_support());
    assert!(config.auto_config().is_none());
    assert!(config.config_class().is_none());
    assert_eq!(config.modules().len(), 1);
}

#[test]
fn test_enable_auto_config_twice_fails() {
    let exit = Arc::new(RecordingExit::default());
    let builder = test_builder(&exit).enable_auto_config(["my_app"]).unwrap();

    let again = builder.enable_auto_config(["other_app"]);
    assert!(matches!(again, Err(BundleError::AutoConfigAlreadyEnabled)));
}

#[test]
fn test_enable_auto_config_with_delegate_after_default_fails() {
    let exit = Arc::new(RecordingExit::default());
    let builder = test_builder(&exit).enable_auto_config(["my_app"]).unwrap();

    let delegate: Arc<dyn AutoConfigDelegate> = Arc::new(RecordingDelegate::default());
    let again = builder.enable_auto_config_with(delegate, ["my_app"]);
    assert!(matches!(again, Err(BundleError::AutoConfigAlreadyEnabled)));
}

#[test]
fn test_enable_auto_config_requires_packages() {
    let exit = Arc::new(RecordingExit::default());
    let empty: Vec<String> = Vec::new();
    let result = test_builder(&exit).enable_auto_config(empty);
    assert!(matches!(result, Err(BundleError::EmptyBasePackages)));

    let blank = test_builder(&exit).enable_auto_config(["my_app", "  "]);
    assert!(matches!(blank, Err(BundleError::InvalidBasePackage { .. })));
}

#[test]
fn test_apply_settings() {
    let exit = Arc::new(RecordingExit::default());
    let settings = BundleSettings {
        use_servlet_support: false,
        auto_config_packages: vec!["my_app.resources".to_string()],
        ..BundleSettings::default()
    };

    let bundle = test_builder(&exit)
        .apply_settings(&settings)
        .unwrap()
        .build_with_stage(settings.stage)
        .unwrap();

    let config = bundle.configuration();
    assert!(!config.servlet_support());
    assert_eq!(
        config.auto_config().map(|a| a.packages().to_vec()),
        Some(vec!["my_app.resources".to_string()])
    );
}

#[test]
fn test_apply_settings_rejects_invalid_settings() {
    let exit = Arc::new(RecordingExit::default());
    let settings = BundleSettings {
        log_level: "chatty".to_string(),
        ..BundleSettings::default()
    };
    let result = test_builder(&exit).apply_settings(&settings);
    assert!(matches!(result, Err(BundleError::Config { .. })));
}
