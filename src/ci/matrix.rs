//! CI Matrix Builder
//!
//! Computes every presubmit task from the registry, the configured runners,
//! the allow-list and the discovered test workspaces. The result is a typed
//! [`CiMatrix`]; serialising it is [`super::presubmit`]'s job.
//!
//! Task order is part of the output contract and is never re-sorted:
//! 1. one aggregate `main_{runner}` task per non-windows runner, in runner
//!    order, listing language builds and gated routeguide client/server tests
//! 2. one task per (language, rule, runner) passing the Platform Filter
//! 3. one task per (test workspace, runner) not excluded for that runner

use super::platform::{CiRunner, Platform, should_run};
use crate::error::GenerateError;
use crate::registry::{Language, Registry, Rule};
use crate::utils::slash_join;
use crate::workspaces::{AllowList, TEST_WORKSPACES_DIR, WorkspaceExclusions};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Platforms that never get the aggregate build-everything task
pub const AGGREGATE_EXCLUDED_PLATFORMS: &[Platform] = &[Platform::Windows];

/// Works around bazelbuild/bazel#4341 on macOS
pub const MACOS_COPT: &str = "--copt=-DGRPC_BAZEL_BUILD";

pub const TEST_OUTPUT_ERRORS: &str = "--test_output=errors";

/// Label of the routeguide interop test between two languages
pub fn routeguide_label(client: &Language, server: &Language) -> String {
    format!("//example/routeguide:{}_{}", client.name, server.name)
}

/// One presubmit task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CiTask {
    pub name: String,
    pub platform: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub build_flags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub build_targets: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_flags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

/// Ordered task list keyed by platform-qualified task name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CiMatrix {
    pub tasks: IndexMap<String, CiTask>,
}

impl CiMatrix {
    pub fn task(&self, key: &str) -> Option<&CiTask> {
        self.tasks.get(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn push(&mut self, key: String, task: CiTask) -> Result<(), GenerateError> {
        match self.tasks.entry(key) {
            Entry::Occupied(entry) => Err(GenerateError::Config(format!(
                "duplicate CI task key `{}`",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(task);
                Ok(())
            }
        }
    }
}

pub struct CiMatrixBuilder<'a> {
    registry: &'a Registry,
    runners: &'a [CiRunner],
    allow_list: &'a AllowList,
    root: String,
    workspaces: &'a [String],
    workspace_exclusions: Option<&'a WorkspaceExclusions>,
}

impl<'a> CiMatrixBuilder<'a> {
    pub fn new(registry: &'a Registry, runners: &'a [CiRunner], allow_list: &'a AllowList) -> Self {
        Self {
            registry,
            runners,
            allow_list,
            root: ".".to_string(),
            workspaces: &[],
            workspace_exclusions: None,
        }
    }

    /// Scan root that working directories are relative to
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn workspaces(mut self, workspaces: &'a [String], exclusions: &'a WorkspaceExclusions) -> Self {
        self.workspaces = workspaces;
        self.workspace_exclusions = Some(exclusions);
        self
    }

    /// Fails when two tasks would share a key, which happens when a runner is
    /// listed twice or a language/rule name pair spells another task's key.
    pub fn build(&self) -> Result<CiMatrix, GenerateError> {
        let mut matrix = CiMatrix::default();
        self.push_aggregate_tasks(&mut matrix)?;
        self.push_example_tasks(&mut matrix)?;
        self.push_workspace_tasks(&mut matrix)?;
        tracing::debug!(tasks = matrix.len(), "built CI matrix");
        Ok(matrix)
    }

    fn push_aggregate_tasks(&self, matrix: &mut CiMatrix) -> Result<(), GenerateError> {
        for runner in self.runners {
            if AGGREGATE_EXCLUDED_PLATFORMS.contains(&runner.platform) {
                continue;
            }
            let platform = runner.platform;
            let languages = self.registry.languages();

            let build_targets = languages
                .iter()
                .filter(|lang| should_run(lang, None, platform))
                .map(|lang| format!("//{}/...", lang.dir))
                .collect();

            let mut test_targets = Vec::new();
            for client in languages.iter().filter(|lang| should_run(lang, None, platform)) {
                for server in languages.iter().filter(|lang| should_run(lang, None, platform)) {
                    let label = routeguide_label(client, server);
                    if self.allow_list.contains(&label) {
                        test_targets.push(label);
                    }
                }
            }

            let mut test_flags = macos_flags(runner);
            test_flags.push(TEST_OUTPUT_ERRORS.to_string());

            matrix.push(
                format!("main_{runner}"),
                CiTask {
                    name: "build & test all".to_string(),
                    platform: runner.name.clone(),
                    environment: BTreeMap::from([("CC".to_string(), "clang".to_string())]),
                    build_flags: macos_flags(runner),
                    build_targets,
                    test_flags,
                    test_targets,
                    working_directory: None,
                },
            )?;
        }
        Ok(())
    }

    fn push_example_tasks(&self, matrix: &mut CiMatrix) -> Result<(), GenerateError> {
        for (lang, rule) in self.registry.rules() {
            let working_directory = slash_join(&self.root, &["example", &lang.dir, &rule.name]);
            for runner in self.runners {
                if !should_run(lang, Some(rule), runner.platform) {
                    continue;
                }
                matrix.push(
                    format!("{}_{}_{}", lang.name, rule.name, runner),
                    CiTask {
                        name: format!("{}: {}", lang.name, rule.name),
                        platform: runner.name.clone(),
                        environment: example_environment(lang, rule),
                        build_flags: macos_flags(runner),
                        build_targets: vec!["//...".to_string()],
                        working_directory: Some(working_directory.clone()),
                        ..CiTask::default()
                    },
                )?;
            }
        }
        Ok(())
    }

    fn push_workspace_tasks(&self, matrix: &mut CiMatrix) -> Result<(), GenerateError> {
        for workspace in self.workspaces {
            let excluded = self
                .workspace_exclusions
                .and_then(|exclusions| exclusions.get(workspace));
            let working_directory = slash_join(&self.root, &[TEST_WORKSPACES_DIR, workspace]);
            for runner in self.runners {
                if excluded.is_some_and(|platforms| platforms.contains(&runner.platform)) {
                    continue;
                }
                let mut test_flags = macos_flags(runner);
                test_flags.push(TEST_OUTPUT_ERRORS.to_string());
                matrix.push(
                    format!("test_workspace_{workspace}_{runner}"),
                    CiTask {
                        name: format!("test workspace: {workspace}"),
                        platform: runner.name.clone(),
                        build_flags: macos_flags(runner),
                        test_flags,
                        test_targets: vec!["//...".to_string()],
                        working_directory: Some(working_directory.clone()),
                        ..CiTask::default()
                    },
                )?;
            }
        }
        Ok(())
    }
}

fn macos_flags(runner: &CiRunner) -> Vec<String> {
    if runner.is_macos() {
        vec![MACOS_COPT.to_string()]
    } else {
        Vec::new()
    }
}

/// Language environment overlaid with the rule's; the rule wins on conflicts.
fn example_environment(lang: &Language, rule: &Rule) -> BTreeMap<String, String> {
    let mut environment = lang.ci_env.clone();
    environment.extend(rule.ci_env.iter().map(|(k, v)| (k.clone(), v.clone())));
    environment
}
