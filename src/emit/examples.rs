//! Example scaffolds: a `WORKSPACE`, `BUILD.bazel` and `.bazelrc` under
//! `example/{lang.dir}/{rule}` for every rule, plus the http_archive test
//! workspace that pins a released archive.

use super::example_dir;
use crate::archive::archive_url;
use crate::error::GenerateError;
use crate::registry::{Flag, Language, Rule};
use crate::render::{LineWriter, RuleContext};
use crate::utils::up_levels;
use crate::workspaces::TEST_WORKSPACES_DIR;
use std::path::{Path, PathBuf};

pub const WORKSPACE_FILE: &str = "WORKSPACE";
pub const BUILD_FILE: &str = "BUILD.bazel";
pub const BAZELRC_FILE: &str = ".bazelrc";
pub const HTTP_ARCHIVE_WORKSPACE: &str = "readme_http_archive";

/// `example/` plus the rule directory sit below the language directory.
const EXAMPLE_NESTING: usize = 2;

/// Relative path from an example directory back to the collection root
pub fn example_relpath(lang: &Language) -> String {
    up_levels(lang.dir_depth() + EXAMPLE_NESTING)
}

pub fn example_workspace(lang: &Language, rule: &Rule) -> Result<LineWriter, GenerateError> {
    let mut out = LineWriter::new();
    out.w(format!(
        r#"local_repository(
    name = "rules_proto_grpc",
    path = "{}",
)

load("@rules_proto_grpc//:repositories.bzl", "rules_proto_grpc_toolchains", "rules_proto_grpc_repos")
rules_proto_grpc_toolchains()
rules_proto_grpc_repos()

load("@rules_proto//proto:repositories.bzl", "rules_proto_dependencies", "rules_proto_toolchains")
rules_proto_dependencies()
rules_proto_toolchains()"#,
        example_relpath(lang)
    ));
    out.ln();
    out.t(
        &format!("{} workspace example", rule.name),
        &rule.workspace_example,
        &RuleContext { lang, rule },
    )?;
    out.ln();
    Ok(out)
}

pub fn example_build_file(lang: &Language, rule: &Rule) -> Result<LineWriter, GenerateError> {
    let mut out = LineWriter::new();
    out.t(
        &format!("{} build example", rule.name),
        &rule.build_example,
        &RuleContext { lang, rule },
    )?;
    out.ln();
    Ok(out)
}

/// Language flags first, then the rule's own, each under a comment line.
pub fn example_bazelrc(lang: &Language, rule: &Rule) -> LineWriter {
    let mut out = LineWriter::new();
    for flag in lang.flags.iter().chain(&rule.flags) {
        push_flag(&mut out, flag);
    }
    out.ln();
    out
}

fn push_flag(out: &mut LineWriter, flag: &Flag) {
    if flag.description.is_empty() {
        out.w("#");
    } else {
        out.w(format!("# {}", flag.description));
    }
    out.w(flag.rc_line());
}

pub fn write_examples(root: &Path, lang: &Language) -> Result<(), GenerateError> {
    for rule in &lang.rules {
        let dir = example_dir(root, lang, rule);
        example_workspace(lang, rule)?.write(&dir.join(WORKSPACE_FILE))?;
        example_build_file(lang, rule)?.write(&dir.join(BUILD_FILE))?;
        example_bazelrc(lang, rule).write(&dir.join(BAZELRC_FILE))?;
    }
    Ok(())
}

pub fn http_archive_path(root: &Path) -> PathBuf {
    root.join(TEST_WORKSPACES_DIR)
        .join(HTTP_ARCHIVE_WORKSPACE)
        .join(WORKSPACE_FILE)
}

/// WORKSPACE fetching the collection as a release archive.
///
/// `github_url` carries a `{ref}` placeholder; the same `git_ref` is used for
/// the extraction prefix so both always agree.
pub fn http_archive_workspace(github_url: &str, git_ref: &str, sha256: &str) -> LineWriter {
    let mut out = LineWriter::new();
    out.w(format!(
        r#"load("@bazel_tools//tools/build_defs/repo:http.bzl", "http_archive")

http_archive(
    name = "rules_proto_grpc",
    urls = ["{url}"],
    sha256 = "{sha256}",
    strip_prefix = "rules_proto_grpc-{git_ref}",
)"#,
        url = archive_url(github_url, git_ref),
    ));
    out.ln();
    out
}

pub fn write_http_archive_workspace(
    root: &Path,
    github_url: &str,
    git_ref: &str,
    sha256: &str,
) -> Result<(), GenerateError> {
    http_archive_workspace(github_url, git_ref, sha256).write(&http_archive_path(root))
}
