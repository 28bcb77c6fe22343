//! Rule implementation files (`{rule}.bzl`) and the per-language `defs.bzl`
//! aggregator.

use super::language_dir;
use crate::error::GenerateError;
use crate::registry::{Language, Rule};
use crate::render::{LineWriter, RuleContext};
use std::path::Path;

pub const DEFS_FILE: &str = "defs.bzl";

/// The rendered implementation template of one rule
pub fn rule_file(lang: &Language, rule: &Rule) -> Result<LineWriter, GenerateError> {
    let mut out = LineWriter::new();
    out.t(
        &format!("{}.bzl", rule.name),
        &rule.implementation,
        &RuleContext { lang, rule },
    )?;
    out.ln();
    Ok(out)
}

pub fn write_rules(root: &Path, lang: &Language) -> Result<(), GenerateError> {
    let dir = language_dir(root, lang);
    for rule in &lang.rules {
        rule_file(lang, rule)?.write(&dir.join(format!("{}.bzl", rule.name)))?;
    }
    Ok(())
}

/// Loads every rule under a private alias, re-exports it publicly, then
/// re-exports the language's aliases in name order.
pub fn defs_file(lang: &Language) -> LineWriter {
    let mut out = LineWriter::new();
    out.w(format!("# Aggregate all `{}` rules to one loadable file", lang.name));
    for rule in &lang.rules {
        out.w(format!(r#"load(":{0}.bzl", _{0}="{0}")"#, rule.name));
    }
    out.ln();
    for rule in &lang.rules {
        out.w(format!("{0} = _{0}", rule.name));
    }
    out.ln();

    if !lang.aliases.is_empty() {
        out.w("# Aliases");
        // BTreeMap iteration is already sorted by alias name
        for (alias, target) in &lang.aliases {
            out.w(format!("{alias} = _{target}"));
        }
        out.ln();
    }
    out
}

pub fn write_defs(root: &Path, lang: &Language) -> Result<(), GenerateError> {
    defs_file(lang).write(&language_dir(root, lang).join(DEFS_FILE))
}
