//! Markdown documentation: one `README.md` per language and the top-level
//! `README.md` indexing every rule.

use super::language_dir;
use crate::error::GenerateError;
use crate::registry::{Language, Registry, Rule};
use crate::render::{LanguageContext, LineWriter, RuleContext};
use serde::Serialize;
use std::path::Path;

pub const README_FILE: &str = "README.md";

pub const EXPERIMENTAL_NOTE: &str =
    "> NOTE: this rule is EXPERIMENTAL.  It may not work correctly or even compile!";

/// Values available to the top-level README header and footer templates
#[derive(Debug, Clone, Serialize)]
pub struct ReadmeData {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha256: String,
}

pub fn language_readme(lang: &Language) -> Result<LineWriter, GenerateError> {
    let mut out = LineWriter::new();

    out.w(format!("# {} rules", lang.display_name));
    out.ln();

    if let Some(notes) = &lang.notes {
        out.t(&format!("{} notes", lang.name), notes, &LanguageContext { lang })?;
        out.ln();
    }

    out.w("| Rule | Description |");
    out.w("| ---: | :--- |");
    for rule in &lang.rules {
        out.w(format!("| [{0}](#{0}) | {1} |", rule.name, rule.doc));
    }
    out.ln();

    for rule in &lang.rules {
        rule_section(&mut out, lang, rule)?;
    }
    Ok(out)
}

fn rule_section(out: &mut LineWriter, lang: &Language, rule: &Rule) -> Result<(), GenerateError> {
    let context = RuleContext { lang, rule };

    out.w("---");
    out.ln();
    out.w(format!("## `{}`", rule.name));
    out.ln();

    if rule.experimental {
        out.w(EXPERIMENTAL_NOTE);
        out.ln();
    }
    out.w(rule.doc.as_str());
    out.ln();

    out.w("### `WORKSPACE`");
    out.ln();
    out.w("```starlark");
    out.t(&format!("{} workspace example", rule.name), &rule.workspace_example, &context)?;
    out.w("```");
    out.ln();

    out.w("### `BUILD.bazel`");
    out.ln();
    out.w("```starlark");
    out.t(&format!("{} build example", rule.name), &rule.build_example, &context)?;
    out.w("```");
    out.ln();

    if !rule.flags.is_empty() {
        out.w("### `Flags`");
        out.ln();
        out.w("| Category | Flag | Value | Description |");
        out.w("| --- | --- | --- | --- |");
        for flag in &rule.flags {
            out.w(format!(
                "| {} | {} | {} | {} |",
                flag.category, flag.name, flag.value, flag.description
            ));
        }
        out.ln();
    }

    out.w("### Attributes");
    out.ln();
    out.w("| Name | Type | Mandatory | Default | Description |");
    out.w("| ---: | :--- | --------- | ------- | ----------- |");
    for attr in &rule.attrs {
        out.w(format!(
            "| `{}` | `{}` | {} | `{}`    | {}          |",
            attr.name, attr.kind, attr.mandatory, attr.default, attr.doc
        ));
    }
    out.ln();
    Ok(())
}

pub fn write_language_readme(root: &Path, lang: &Language) -> Result<(), GenerateError> {
    language_readme(lang)?.write(&language_dir(root, lang).join(README_FILE))
}

/// Header template, the global rule index in registry order, footer template.
pub fn readme(
    registry: &Registry,
    header: &Path,
    footer: &Path,
    data: &ReadmeData,
) -> Result<LineWriter, GenerateError> {
    let mut out = LineWriter::new();

    out.tpl(header, data)?;
    out.ln();

    out.w("## Rules");
    out.ln();

    out.w("| Language | Rule | Description");
    out.w("| ---: | :--- | :--- |");
    for (lang, rule) in registry.rules() {
        let dir_link = format!("[{}](/{})", lang.display_name, lang.dir);
        let rule_link = format!("[{0}](/{1}#{0})", rule.name, lang.dir);
        let example_link = format!("[example](/example/{}/{})", lang.dir, rule.name);
        out.w(format!("| {dir_link} | {rule_link} | {} ({example_link}) |", rule.doc));
    }
    out.ln();

    out.tpl(footer, data)?;
    Ok(out)
}

pub fn write_readme(
    root: &Path,
    registry: &Registry,
    header: &Path,
    footer: &Path,
    data: &ReadmeData,
) -> Result<(), GenerateError> {
    readme(registry, header, footer, data)?.write(&root.join(README_FILE))
}
