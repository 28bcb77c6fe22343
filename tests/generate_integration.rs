use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use rulegen::registry::{Language, Rule};
use rulegen::{GenerateError, GeneratorConfig, Registry, RegistryError, generate};
use serde_yaml::Value;
use similar::TextDiff;
use walkdir::WalkDir;

const AVAILABLE_TESTS: &str = "//example/routeguide:cpp_cpp\n//example/routeguide:cpp_go\n//example/routeguide:go_go\n";

struct Fixture {
    _root: tempfile::TempDir,
    dir: PathBuf,
    inputs: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("root tempdir");
        let dir = root.path().to_path_buf();
        for workspace in ["shared_proto", "python_deps", "readme_http_archive", ".cache", "bazel-out"] {
            fs::create_dir_all(dir.join("test_workspaces").join(workspace)).expect("workspace dir");
        }

        let inputs = tempfile::tempdir().expect("inputs tempdir");
        fs::write(
            inputs.path().join("README.header.md"),
            "# rules_proto_grpc\n\nref: {{ ref }}\n",
        )
        .expect("header");
        fs::write(
            inputs.path().join("README.footer.md"),
            "sha256: {{ sha256 }}\n",
        )
        .expect("footer");
        fs::write(inputs.path().join("available_tests.txt"), AVAILABLE_TESTS).expect("tests");

        Self {
            _root: root,
            dir,
            inputs,
        }
    }

    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            dir: self.dir.to_string_lossy().into_owned(),
            header: self.inputs.path().join("README.header.md"),
            footer: self.inputs.path().join("README.footer.md"),
            git_ref: "1.0.2".to_string(),
            sha256: "0123abcd".to_string(),
            available_tests: self.inputs.path().join("available_tests.txt"),
            ..GeneratorConfig::default()
        }
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.join(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        WalkDir::new(&self.dir)
            .into_iter()
            .map(|entry| entry.expect("walk"))
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(&self.dir)
                    .expect("under root")
                    .to_string_lossy()
                    .into_owned();
                let contents = fs::read_to_string(entry.path()).expect("utf-8 output");
                (relative, contents)
            })
            .collect()
    }

    fn presubmit(&self) -> Value {
        serde_yaml::from_str(&self.read(".bazelci/presubmit.yml")).expect("valid yaml")
    }
}

fn strings(value: &Value) -> Vec<&str> {
    value
        .as_sequence()
        .map(|seq| seq.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn generates_every_artifact_family() {
    let fixture = Fixture::new();
    generate(&fixture.config(), &Registry::builtin()).expect("generate");

    for path in [
        "README.md",
        "cpp/README.md",
        "cpp/defs.bzl",
        "cpp/cpp_grpc_library.bzl",
        "example/cpp/cpp_grpc_library/WORKSPACE",
        "example/cpp/cpp_grpc_library/BUILD.bazel",
        "example/cpp/cpp_grpc_library/.bazelrc",
        "github.com/gogo/protobuf/defs.bzl",
        "example/github.com/gogo/protobuf/gogo_proto_compile/WORKSPACE",
        ".bazelci/presubmit.yml",
        "example/Makefile.mk",
        "test_workspaces/Makefile.mk",
        "test_workspaces/readme_http_archive/WORKSPACE",
    ] {
        assert!(fixture.dir.join(path).is_file(), "missing {path}");
    }

    let readme = fixture.read("README.md");
    assert!(readme.starts_with("# rules_proto_grpc\n\nref: 1.0.2\n\n## Rules\n"));
    assert!(readme.ends_with("sha256: 0123abcd"));
    assert!(readme.contains("[cpp_grpc_library](/cpp#cpp_grpc_library)"));

    let archive = fixture.read("test_workspaces/readme_http_archive/WORKSPACE");
    assert!(archive.contains("archive/1.0.2.tar.gz"));
    assert!(archive.contains(r#"sha256 = "0123abcd","#));
    assert!(archive.contains(r#"strip_prefix = "rules_proto_grpc-1.0.2","#));

    let workspace = fixture.read("example/github.com/gogo/protobuf/gogo_proto_compile/WORKSPACE");
    assert!(workspace.contains(r#"path = "../../../../../","#));
}

#[test]
fn regeneration_is_byte_identical() {
    let fixture = Fixture::new();
    let registry = Registry::builtin();

    generate(&fixture.config(), &registry).expect("first run");
    let first = fixture.snapshot();
    generate(&fixture.config(), &registry).expect("second run");
    let second = fixture.snapshot();

    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
    for (path, before) in &first {
        let after = &second[path];
        if before != after {
            let diff = TextDiff::from_lines(before.as_str(), after.as_str());
            panic!(
                "{path} changed between runs:\n{}",
                diff.unified_diff().header("first", "second")
            );
        }
    }
}

#[test]
fn routeguide_tests_are_gated_by_allow_list() {
    let fixture = Fixture::new();
    let registry = Registry::new(vec![
        Language::new("cpp", "C++", "cpp")
            .with_rules(vec![Rule::new("cpp_grpc_library", "doc", "", "", "")]),
        Language::new("go", "Go", "go")
            .with_rules(vec![Rule::new("go_grpc_library", "doc", "", "", "")]),
    ]);
    generate(&fixture.config(), &registry).expect("generate");

    let presubmit = fixture.presubmit();
    let main = &presubmit["tasks"]["main_ubuntu1804"];
    assert_eq!(
        strings(&main["test_targets"]),
        vec![
            "//example/routeguide:cpp_cpp",
            "//example/routeguide:cpp_go",
            "//example/routeguide:go_go",
        ]
    );
    assert_eq!(strings(&main["build_targets"]), vec!["//cpp/...", "//go/..."]);
    assert!(presubmit["tasks"].get("main_windows").is_none());
}

#[test]
fn workspace_tasks_follow_discovery_and_exclusions() {
    let fixture = Fixture::new();
    generate(&fixture.config(), &Registry::builtin()).expect("generate");

    let presubmit = fixture.presubmit();
    let tasks = presubmit["tasks"].as_mapping().expect("tasks mapping");
    let workspace_keys: Vec<_> = tasks
        .keys()
        .filter_map(Value::as_str)
        .filter(|key| key.starts_with("test_workspace_"))
        .collect();
    assert_eq!(
        workspace_keys,
        vec![
            "test_workspace_python_deps_ubuntu1804",
            "test_workspace_python_deps_macos",
            "test_workspace_readme_http_archive_ubuntu1804",
            "test_workspace_readme_http_archive_windows",
            "test_workspace_readme_http_archive_macos",
            "test_workspace_shared_proto_ubuntu1804",
            "test_workspace_shared_proto_windows",
            "test_workspace_shared_proto_macos",
        ]
    );

    let makefile = fixture.read("test_workspaces/Makefile.mk");
    assert!(makefile.ends_with(
        "all_test_workspaces: test_workspace_python_deps test_workspace_readme_http_archive test_workspace_shared_proto\n"
    ));
}

#[test]
fn experimental_rules_get_no_ci_tasks() {
    let fixture = Fixture::new();
    generate(&fixture.config(), &Registry::builtin()).expect("generate");

    let presubmit = fixture.presubmit();
    let tasks = presubmit["tasks"].as_mapping().expect("tasks mapping");
    assert!(
        !tasks
            .keys()
            .filter_map(Value::as_str)
            .any(|key| key.starts_with("objc_objc_grpc_library_") || key.starts_with("d_"))
    );
    assert!(tasks.contains_key("objc_objc_proto_compile_macos"));
    assert!(!tasks.contains_key("objc_objc_proto_compile_windows"));

    // experimental rules are still documented and scaffolded
    assert!(fixture.read("objc/README.md").contains("EXPERIMENTAL"));
    assert!(fixture.dir.join("example/objc/objc_grpc_library/BUILD.bazel").is_file());
}

#[test]
fn missing_allow_list_aborts_before_writing() {
    let fixture = Fixture::new();
    let config = GeneratorConfig {
        available_tests: fixture.inputs.path().join("missing.txt"),
        ..fixture.config()
    };
    assert_matches!(
        generate(&config, &Registry::builtin()),
        Err(GenerateError::Read { path, .. }) if path.ends_with("missing.txt")
    );
    assert!(!fixture.dir.join("README.md").exists());
    assert!(!fixture.dir.join("cpp").exists());
}

#[test]
fn invalid_registry_aborts_before_writing() {
    let fixture = Fixture::new();
    let registry = Registry::new(vec![Language::new("cpp", "C++", "cpp")
        .with_rules(vec![Rule::new("cpp_grpc_library", "doc", "", "", "")])
        .with_alias("cc_grpc_library", "cpp_missing_rule")]);
    assert_matches!(
        generate(&fixture.config(), &registry),
        Err(GenerateError::Registry(RegistryError::DanglingAlias { alias, .. })) if alias == "cc_grpc_library"
    );
    assert!(!Path::new(&fixture.dir).join("cpp").exists());
}

#[test]
fn missing_test_workspaces_dir_is_fatal() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.dir.join("test_workspaces")).expect("remove");
    assert_matches!(
        generate(&fixture.config(), &Registry::builtin()),
        Err(GenerateError::Read { .. })
    );
}

#[test]
fn repeated_ci_runner_aborts_before_writing() {
    let fixture = Fixture::new();
    let config = GeneratorConfig {
        ci_platforms: vec!["ubuntu1804".to_string(), "ubuntu1804".to_string()],
        ..fixture.config()
    };
    assert_matches!(
        generate(&config, &Registry::builtin()),
        Err(GenerateError::Config(msg)) if msg.contains("listed more than once")
    );
    assert!(!fixture.dir.join("README.md").exists());
    assert!(!fixture.dir.join(".bazelci").exists());
}

#[test]
fn test_workspaces_file_is_fatal() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.dir.join("test_workspaces")).expect("remove");
    fs::write(fixture.dir.join("test_workspaces"), "not a dir").expect("file");
    assert_matches!(
        generate(&fixture.config(), &Registry::builtin()),
        Err(GenerateError::Read { path, .. }) if path.ends_with("test_workspaces")
    );
    assert!(!fixture.dir.join("README.md").exists());
}
