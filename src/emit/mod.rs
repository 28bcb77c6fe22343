//! Per-Artifact Emitters
//!
//! Each emitter turns the registry (or one language of it) into a
//! [`LineWriter`](crate::render::LineWriter) and flushes it under the scan
//! root. Builders that return the writer are kept separate from the `write_*`
//! functions that touch the filesystem, so output can be inspected in tests
//! without a scratch directory.

pub mod docs;
pub mod examples;
pub mod makefile;
pub mod rules;

use crate::registry::{Language, Rule};
use std::path::{Path, PathBuf};

pub const EXAMPLE_DIR: &str = "example";

/// `{root}/{lang.dir}` as a native path
pub fn language_dir(root: &Path, lang: &Language) -> PathBuf {
    lang.dir
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// `{root}/example/{lang.dir}/{rule}` as a native path
pub fn example_dir(root: &Path, lang: &Language, rule: &Rule) -> PathBuf {
    language_dir(&root.join(EXAMPLE_DIR), lang).join(&rule.name)
}
