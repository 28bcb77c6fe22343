//! `.bazelci/presubmit.yml` writer

use super::matrix::CiMatrix;
use crate::error::GenerateError;
use crate::render::LineWriter;
use std::path::{Path, PathBuf};

pub const PRESUBMIT_FILE: &str = ".bazelci/presubmit.yml";

pub fn presubmit_path(root: &Path) -> PathBuf {
    root.join(".bazelci").join("presubmit.yml")
}

/// The matrix as a YAML document, including the leading `---` marker.
pub fn render_presubmit(matrix: &CiMatrix) -> Result<String, GenerateError> {
    Ok(presubmit_writer(matrix)?.contents())
}

pub fn write_presubmit(root: &Path, matrix: &CiMatrix) -> Result<(), GenerateError> {
    presubmit_writer(matrix)?.write(&presubmit_path(root))?;
    tracing::info!(tasks = matrix.len(), "wrote {PRESUBMIT_FILE}");
    Ok(())
}

fn presubmit_writer(matrix: &CiMatrix) -> Result<LineWriter, GenerateError> {
    let yaml = serde_yaml::to_string(matrix).map_err(|source| GenerateError::Serialize {
        name: PRESUBMIT_FILE.to_string(),
        source,
    })?;

    let mut out = LineWriter::new();
    out.w("---");
    out.w(yaml.trim_end());
    out.ln();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::matrix::CiMatrixBuilder;
    use crate::ci::platform::CiRunner;
    use crate::registry::{Language, Registry, Rule};
    use crate::workspaces::AllowList;
    use serde_yaml::Value;
    use tempfile::TempDir;

    fn matrix() -> CiMatrix {
        let registry = Registry::new(vec![
            Language::new("cpp", "C++", "cpp")
                .with_rules(vec![Rule::new("cpp_grpc_library", "doc", "", "", "")]),
            Language::new("csharp", "C#", "csharp")
                .with_env("DOTNET_CLI_TELEMETRY_OPTOUT", "1")
                .with_rules(vec![Rule::new("csharp_grpc_library", "doc", "", "", "")]),
        ]);
        let runners: Vec<CiRunner> = ["ubuntu1804", "macos"]
            .iter()
            .map(|name| name.parse().unwrap())
            .collect();
        let allow_list = AllowList::parse("//example/routeguide:cpp_csharp\n");
        CiMatrixBuilder::new(&registry, &runners, &allow_list)
            .build()
            .unwrap()
    }

    #[test]
    fn test_document_starts_with_marker_and_keeps_task_order() {
        let text = render_presubmit(&matrix()).unwrap();
        assert!(text.starts_with("---\ntasks:\n"));
        assert!(text.ends_with('\n'));

        let doc: Value = serde_yaml::from_str(&text).unwrap();
        let tasks = doc["tasks"].as_mapping().unwrap();
        let keys: Vec<_> = tasks.keys().filter_map(Value::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "main_ubuntu1804",
                "main_macos",
                "cpp_cpp_grpc_library_ubuntu1804",
                "cpp_cpp_grpc_library_macos",
                "csharp_csharp_grpc_library_ubuntu1804",
                "csharp_csharp_grpc_library_macos",
            ]
        );
    }

    #[test]
    fn test_task_fields_round_trip_through_yaml() {
        let text = render_presubmit(&matrix()).unwrap();
        let doc: Value = serde_yaml::from_str(&text).unwrap();

        let main = &doc["tasks"]["main_macos"];
        assert_eq!(main["name"].as_str(), Some("build & test all"));
        assert_eq!(main["environment"]["CC"].as_str(), Some("clang"));
        assert_eq!(main["build_flags"][0].as_str(), Some("--copt=-DGRPC_BAZEL_BUILD"));
        assert_eq!(main["test_flags"][1].as_str(), Some("--test_output=errors"));
        assert_eq!(main["test_targets"][0].as_str(), Some("//example/routeguide:cpp_csharp"));
        assert!(main.get("working_directory").is_none());

        let example = &doc["tasks"]["csharp_csharp_grpc_library_ubuntu1804"];
        assert_eq!(example["name"].as_str(), Some("csharp: csharp_grpc_library"));
        assert_eq!(example["environment"]["DOTNET_CLI_TELEMETRY_OPTOUT"].as_str(), Some("1"));
        assert_eq!(example["build_targets"][0].as_str(), Some("//..."));
        assert_eq!(
            example["working_directory"].as_str(),
            Some("example/csharp/csharp_grpc_library")
        );
        assert!(example.get("build_flags").is_none());
        assert!(example.get("test_targets").is_none());

        let cpp = &doc["tasks"]["cpp_cpp_grpc_library_ubuntu1804"];
        assert!(cpp.get("environment").is_none());
    }

    #[test]
    fn test_write_presubmit_creates_bazelci_dir() {
        let root = TempDir::new().unwrap();
        write_presubmit(root.path(), &matrix()).unwrap();
        let written = std::fs::read_to_string(root.path().join(PRESUBMIT_FILE)).unwrap();
        assert_eq!(written, render_presubmit(&matrix()).unwrap());
    }
}
