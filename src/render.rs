//! Line-oriented text accumulator shared by every emitter.
//!
//! Emitters push literal lines, blank separators and expanded templates into a
//! [`LineWriter`], then [`LineWriter::write`] flushes the whole buffer to disk
//! in one atomic rename. Templates are tera sources; an undefined variable is
//! an error, never an empty string.

use crate::error::GenerateError;
use crate::registry::{Language, Rule, Template};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Context for templates that only see a language (`lang.*`)
#[derive(Debug, Serialize)]
pub struct LanguageContext<'a> {
    pub lang: &'a Language,
}

/// Context for rule templates (`lang.*` and `rule.*`)
#[derive(Debug, Serialize)]
pub struct RuleContext<'a> {
    pub lang: &'a Language,
    pub rule: &'a Rule,
}

#[derive(Debug, Default)]
pub struct LineWriter {
    lines: Vec<String>,
}

impl LineWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line. Callers build it with `format!`.
    pub fn w(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a blank separator unless the last line is already blank.
    pub fn ln(&mut self) {
        if self.lines.last().is_some_and(|line| line.is_empty()) {
            return;
        }
        self.lines.push(String::new());
    }

    /// Expand `template` against `data` and append the resulting lines.
    ///
    /// `name` identifies the template in error messages.
    pub fn t<T: Serialize>(
        &mut self,
        name: &str,
        template: &Template,
        data: &T,
    ) -> Result<(), GenerateError> {
        let rendered = render(name, template.source(), data)?;
        self.push_block(&rendered);
        Ok(())
    }

    /// Load a template from disk, expand it against `data` and append it.
    pub fn tpl<T: Serialize>(&mut self, path: &Path, data: &T) -> Result<(), GenerateError> {
        let source = fs::read_to_string(path).map_err(|e| GenerateError::read(path, e))?;
        let rendered = render(&path.display().to_string(), &source, data)?;
        self.push_block(&rendered);
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The accumulated text; lines are joined with `\n`.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    /// Write the accumulated text to `path`, replacing any existing file.
    ///
    /// Parent directories are created as needed. The text lands in a `.tmp`
    /// sibling first and is renamed into place.
    pub fn write(&self, path: &Path) -> Result<(), GenerateError> {
        let contents = self.contents();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GenerateError::write(parent, e))?;
        }

        let tmp_path = tmp_sibling(path);
        fs::write(&tmp_path, contents.as_bytes()).map_err(|e| GenerateError::write(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(GenerateError::write(path, e));
        }

        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }

    fn push_block(&mut self, rendered: &str) {
        let trimmed = rendered.trim_end_matches('\n');
        if trimmed.is_empty() {
            return;
        }
        self.lines.extend(trimmed.split('\n').map(str::to_string));
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Expand one tera source against a serializable context.
pub fn render<T: Serialize>(name: &str, source: &str, data: &T) -> Result<String, GenerateError> {
    let context = Context::from_serialize(data).map_err(|e| GenerateError::template(name, e))?;
    Tera::one_off(source, &context, false).map_err(|e| GenerateError::template(name, e))
}
