use std::env;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rulegen::ci::platform::Platform;
use rulegen::{CliArgs, GeneratorConfig};
use serial_test::serial;

#[test]
#[serial]
fn merges_config_file_and_cli_overrides() {
    let config_dir = tempfile::tempdir().expect("config tempdir");
    let config_path = config_dir.path().join("rulegen.yaml");
    let yaml = "\
dir: /src/rules_proto_grpc
ref: 1.0.0
sha256: from-file
ci_platforms:
  - rbe_ubuntu1804
  - macos
workspace_exclusions:
  shared_proto:
    - macos
";
    fs::write(&config_path, yaml).expect("write config");

    let args = CliArgs::parse_from([
        "rulegen",
        "--config",
        config_path.to_str().unwrap(),
        "--ref",
        "1.0.2",
        "--github_url",
        "https://mirror.example/rules_proto_grpc/{ref}.tar.gz",
    ]);
    let config = GeneratorConfig::from_args(args).expect("config");

    assert_eq!(config.dir, "/src/rules_proto_grpc");
    assert_eq!(config.git_ref, "1.0.2");
    assert_eq!(config.sha256, "from-file");
    assert_eq!(
        config.github_url,
        "https://mirror.example/rules_proto_grpc/{ref}.tar.gz"
    );
    assert_eq!(config.ci_platforms, vec!["rbe_ubuntu1804", "macos"]);
    assert_eq!(
        config.workspace_exclusions.get("shared_proto"),
        Some(&vec![Platform::Macos])
    );
    assert!(!config.workspace_exclusions.contains_key("python_deps"));
    assert_eq!(
        config.header,
        PathBuf::from("tools/rulegen/README.header.md")
    );
    config.validate().expect("valid");
}

#[test]
#[serial]
fn json_config_is_supported() {
    let config_dir = tempfile::tempdir().expect("config tempdir");
    let config_path = config_dir.path().join("rulegen.json");
    fs::write(
        &config_path,
        r#"{"available_tests": "ci/available_tests.txt", "ci_platforms": ["ubuntu1604"]}"#,
    )
    .expect("write config");

    let args = CliArgs::parse_from(["rulegen", "--config", config_path.to_str().unwrap()]);
    let config = GeneratorConfig::from_args(args).expect("config");
    assert_eq!(config.available_tests, PathBuf::from("ci/available_tests.txt"));
    assert_eq!(config.ci_platforms, vec!["ubuntu1604"]);
}

#[test]
#[serial]
fn environment_fallbacks_apply() {
    unsafe {
        env::set_var("RULEGEN_DIR", "/work");
        env::set_var("RULEGEN_CI_PLATFORMS", "ubuntu1804, macos");
    }

    let args = CliArgs::parse_from(["rulegen"]);
    let config = GeneratorConfig::from_args(args).expect("config");

    unsafe {
        env::remove_var("RULEGEN_DIR");
        env::remove_var("RULEGEN_CI_PLATFORMS");
    }

    assert_eq!(config.dir, "/work");
    assert_eq!(config.ci_platforms, vec!["ubuntu1804", "macos"]);
}

#[test]
#[serial]
fn unsupported_config_extension_is_error() {
    let config_dir = tempfile::tempdir().expect("config tempdir");
    let config_path = config_dir.path().join("rulegen.toml");
    fs::write(&config_path, "dir = \".\"").expect("write config");

    let args = CliArgs::parse_from(["rulegen", "--config", config_path.to_str().unwrap()]);
    let err = GeneratorConfig::from_args(args).expect_err("expected failure");
    assert!(err.to_string().contains("unsupported config extension"));
}

#[test]
#[serial]
fn missing_config_file_is_error() {
    let args = CliArgs {
        config: Some(PathBuf::from("/this/does/not/exist.yaml")),
        ..CliArgs::default()
    };
    let err = GeneratorConfig::from_args(args).expect_err("expected failure");
    assert!(err.to_string().contains("does not exist"));
}

#[test]
#[serial]
fn empty_dir_fails_validation() {
    let args = CliArgs::parse_from(["rulegen", "--dir", ""]);
    let config = GeneratorConfig::from_args(args).expect("config");
    let err = config.validate().expect_err("expected failure");
    assert_eq!(err.to_string(), "configuration error: --dir required");
}
