//! Config file and command-line layering.

use std::path::PathBuf;

use trmnld::auth::Admission;
use trmnld::config::{ConfigOverrides, DEFAULT_PORT, ServerConfig};
use trmnld::error::TrmnlError;

use crate::common::fixtures::{ImageTree, write_config};
use crate::common::init_test_logging;

#[test]
fn relative_image_dir_resolves_against_config_file() {
    init_test_logging();
    let tree = ImageTree::with_files(&["frames/a.png"]);
    let config_path = write_config(
        tree.path(),
        r#"
        port = 8080
        image_dir = "frames"
        setup = true
        allowed_devices = ["aa:bb:cc:dd:ee:ff"]
        "#,
    );

    let config = ServerConfig::load(ConfigOverrides {
        config_file: Some(config_path),
        ..ConfigOverrides::default()
    })
    .unwrap();

    let expected = tree.path().canonicalize().unwrap().join("frames");
    assert_eq!(config.image_dir(), expected);
    assert_eq!(config.port, 8080);
    assert!(config.policy.setup_enabled);
    assert!(config.policy.admission.admits("AA:BB:CC:DD:EE:FF"));
    assert!(matches!(config.policy.admission, Admission::AllowList(_)));
}

#[test]
fn flags_override_file() {
    init_test_logging();
    let tree = ImageTree::empty();
    let config_path = write_config(
        tree.path(),
        r#"
        bind = "127.0.0.1"
        port = 8080
        public_url = "http://file.example"
        allowed_devices = ["AA"]
        "#,
    );

    let config = ServerConfig::load(ConfigOverrides {
        config_file: Some(config_path),
        port: Some(9000),
        image_dir: Some(tree.path().to_path_buf()),
        public_url: Some("https://flag.example/".into()),
        allowed_devices: vec!["BB".into()],
        ..ConfigOverrides::default()
    })
    .unwrap();

    assert_eq!(config.bind, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.image_dir(), tree.path());
    assert_eq!(config.public_url.as_deref(), Some("https://flag.example"));
    assert!(config.policy.admission.admits("bb"));
    assert!(!config.policy.admission.admits("AA"));
    assert!(!config.policy.setup_enabled);
}

#[test]
fn defaults_without_file() {
    init_test_logging();
    let config = ServerConfig::load(ConfigOverrides::default()).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.listen_addr(), format!("0.0.0.0:{DEFAULT_PORT}"));
    assert_eq!(config.policy.admission, Admission::Open);
    assert!(!config.policy.setup_enabled);
}

#[test]
fn missing_config_file() {
    init_test_logging();
    let err = ServerConfig::load(ConfigOverrides {
        config_file: Some(PathBuf::from("/definitely/not/here/trmnld.toml")),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(matches!(err, TrmnlError::ConfigNotFound { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    init_test_logging();
    let tree = ImageTree::empty();
    let config_path = write_config(tree.path(), "secret = \"nope\"\n");
    let err = ServerConfig::load(ConfigOverrides {
        config_file: Some(config_path),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(matches!(err, TrmnlError::ConfigParse(_)));
}

#[test]
fn invalid_public_url() {
    init_test_logging();
    let err = ServerConfig::load(ConfigOverrides {
        image_dir: Some(PathBuf::from(".")),
        public_url: Some("frames.example.com".into()),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(matches!(err, TrmnlError::ConfigInvalid(_)));
}
