//! Inputs discovered on disk: test workspaces under `test_workspaces/` and the
//! allow-list of cross-language routeguide test labels.

use crate::ci::platform::Platform;
use crate::error::GenerateError;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

pub const TEST_WORKSPACES_DIR: &str = "test_workspaces";

/// Workspace name -> platforms its CI tasks must not run on
pub type WorkspaceExclusions = BTreeMap<String, Vec<Platform>>;

/// The python gRPC workspaces cannot build on windows runners.
pub fn default_workspace_exclusions() -> WorkspaceExclusions {
    ["python3_grpc", "python_deps"]
        .into_iter()
        .map(|name| (name.to_string(), vec![Platform::Windows]))
        .collect()
}

/// Names of the test workspaces under `{root}/test_workspaces`, in file-name
/// order.
///
/// Hidden directories and `bazel-*` output symlinks are skipped. A missing
/// `test_workspaces` directory, or a file in its place, is an error.
pub fn find_test_workspaces(root: &Path) -> Result<Vec<String>, GenerateError> {
    let dir = root.join(TEST_WORKSPACES_DIR);
    let metadata = fs::metadata(&dir).map_err(|e| GenerateError::read(&dir, e))?;
    if !metadata.is_dir() {
        return Err(GenerateError::read(
            &dir,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    let mut names = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("directory walk failed"));
            GenerateError::read(&dir, source)
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name.starts_with("bazel-") {
            continue;
        }
        names.push(name.into_owned());
    }
    tracing::debug!(count = names.len(), dir = %dir.display(), "discovered test workspaces");
    Ok(names)
}

/// Test labels known to exist, used to gate cross-language test tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    labels: HashSet<String>,
}

impl AllowList {
    /// Parse a newline-separated list. Blank lines are ignored and a leading
    /// `//` on a label is optional.
    pub fn parse(contents: &str) -> Self {
        let labels = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| normalize(line).to_string())
            .collect();
        Self { labels }
    }

    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let contents = fs::read_to_string(path).map_err(|e| GenerateError::read(path, e))?;
        let list = Self::parse(&contents);
        tracing::debug!(path = %path.display(), labels = list.len(), "loaded test allow-list");
        Ok(list)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(normalize(label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|label| normalize(label.as_ref().trim()).to_string())
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }
}

fn normalize(label: &str) -> &str {
    label.strip_prefix("//").unwrap_or(label)
}
