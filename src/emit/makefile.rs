//! Task-Runner Emitters: `example/Makefile.mk` and `test_workspaces/Makefile.mk`

use super::EXAMPLE_DIR;
use crate::error::GenerateError;
use crate::registry::Registry;
use crate::render::LineWriter;
use crate::utils::{slash_join, up_levels};
use crate::workspaces::TEST_WORKSPACES_DIR;
use std::path::{Path, PathBuf};

pub const MAKEFILE: &str = "Makefile.mk";

pub fn examples_makefile_path(root: &Path) -> PathBuf {
    root.join(EXAMPLE_DIR).join(MAKEFILE)
}

pub fn workspaces_makefile_path(root: &Path) -> PathBuf {
    root.join(TEST_WORKSPACES_DIR).join(MAKEFILE)
}

/// One build target per example, a group per language and `all_examples`.
///
/// `dir` is the scan root as written into the `cd` commands.
pub fn examples_makefile(registry: &Registry, dir: &str) -> LineWriter {
    let mut out = LineWriter::new();
    let mut all_names = Vec::new();

    for lang in registry.languages() {
        let mut lang_names = Vec::new();
        let disk_cache = format!(
            "{}../../bazel-disk-cache",
            up_levels(lang.dir.matches('/').count())
        );

        for rule in &lang.rules {
            let name = format!("{}_{}_example", lang.name, rule.name);
            let example_dir = slash_join(dir, &[EXAMPLE_DIR, &lang.dir, &rule.name]);
            out.w(format!(".PHONY: {name}"));
            out.w(format!("{name}:"));
            out.w(format!("\tcd {example_dir}; \\"));
            out.w(format!(
                "\tbazel --batch build --verbose_failures --disk_cache={disk_cache} //..."
            ));
            out.ln();
            lang_names.push(name);
        }

        let group = format!("{}_examples", lang.name);
        out.w(format!(".PHONY: {group}"));
        out.w(format!("{group}: {}", lang_names.join(" ")));
        out.ln();
        all_names.extend(lang_names);
    }

    out.w(".PHONY: all_examples");
    out.w(format!("all_examples: {}", all_names.join(" ")));
    out.ln();
    out
}

pub fn write_examples_makefile(root: &Path, registry: &Registry, dir: &str) -> Result<(), GenerateError> {
    examples_makefile(registry, dir).write(&examples_makefile_path(root))
}

/// One test target per workspace and `all_test_workspaces`.
pub fn workspaces_makefile(workspaces: &[String], dir: &str) -> LineWriter {
    let mut out = LineWriter::new();
    let mut all_names = Vec::new();

    for workspace in workspaces {
        let name = format!("test_workspace_{workspace}");
        out.w(format!(".PHONY: {name}"));
        out.w(format!("{name}:"));
        out.w(format!("\tcd {}; \\", slash_join(dir, &[TEST_WORKSPACES_DIR, workspace])));
        out.w("\tbazel --batch test --verbose_failures --disk_cache=../bazel-disk-cache --test_output=errors //...");
        out.ln();
        all_names.push(name);
    }

    out.w(".PHONY: all_test_workspaces");
    out.w(format!("all_test_workspaces: {}", all_names.join(" ")));
    out.ln();
    out
}

pub fn write_workspaces_makefile(
    root: &Path,
    workspaces: &[String],
    dir: &str,
) -> Result<(), GenerateError> {
    workspaces_makefile(workspaces, dir).write(&workspaces_makefile_path(root))
}
