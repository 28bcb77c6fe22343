//! Registry Model
//!
//! The registry is the single source of truth for every generated artifact: an
//! ordered list of [`Language`]s, each owning an ordered list of [`Rule`]s with
//! their [`Attr`]s and [`Flag`]s. It is built once by [`Registry::builtin`] (or
//! by a caller assembling its own languages), validated, and then handed to
//! every emitter by shared reference. Nothing mutates it after construction.
//!
//! Ordering contract: the `Vec` order of languages, rules, attrs and flags is
//! the order of every table row, load statement and CI task derived from them.
//! Map-valued fields (`aliases`, `ci_env`) are `BTreeMap`s so their iteration
//! order is lexicographic by key and never depends on hashing.

pub mod languages;
pub mod templates;
mod validate;

use crate::ci::platform::Platform;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

pub use validate::is_identifier;

// ============================================================================
// Templates
// ============================================================================

/// Template source that is late-bound to a rendering context.
///
/// The registry never interprets templates; the renderer expands them against
/// whatever context an emitter supplies (a language, a rule, or both) and
/// fails if a referenced field is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Cow<'static, str>);

impl Template {
    pub const fn from_static(source: &'static str) -> Self {
        Self(Cow::Borrowed(source))
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Template {
    fn from(source: &'static str) -> Self {
        Self::from_static(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self(Cow::Owned(source))
    }
}

// ============================================================================
// Flags and attributes
// ============================================================================

/// Bazel command a flag applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagCategory {
    Build,
    Test,
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagCategory::Build => write!(f, "build"),
            FlagCategory::Test => write!(f, "test"),
        }
    }
}

/// A `.bazelrc` flag required by a language or rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub category: FlagCategory,
    pub name: String,
    pub value: String,
    pub description: String,
}

impl Flag {
    pub fn build(
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: FlagCategory::Build,
            name: name.into(),
            value: value.into(),
            description: description.into(),
        }
    }

    pub fn test(
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: FlagCategory::Test,
            ..Self::build(name, value, description)
        }
    }

    /// The flag as it appears in a `.bazelrc`, e.g. `build --strategy=X=standalone`
    pub fn rc_line(&self) -> String {
        format!("{} --{}={}", self.category, self.name, self.value)
    }
}

/// Documentation-only description of a rule attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub name: String,
    /// Starlark attribute type, e.g. `label_list` or `string`
    #[serde(rename = "type")]
    pub kind: String,
    pub mandatory: bool,
    pub default: String,
    pub doc: String,
}

impl Attr {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        mandatory: bool,
        default: impl Into<String>,
        doc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            mandatory,
            default: default.into(),
            doc: doc.into(),
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

/// One buildable capability offered by a language
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    /// Identifier used as the `.bzl` file stem and the exported symbol
    pub name: String,
    pub doc: String,
    pub experimental: bool,
    #[serde(skip)]
    pub implementation: Template,
    #[serde(skip)]
    pub workspace_example: Template,
    #[serde(skip)]
    pub build_example: Template,
    pub flags: Vec<Flag>,
    pub attrs: Vec<Attr>,
    /// Environment overrides for this rule's CI tasks; win over the language's
    pub ci_env: BTreeMap<String, String>,
    pub skip_test_platforms: Vec<Platform>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        doc: impl Into<String>,
        implementation: impl Into<Template>,
        workspace_example: impl Into<Template>,
        build_example: impl Into<Template>,
    ) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            experimental: false,
            implementation: implementation.into(),
            workspace_example: workspace_example.into(),
            build_example: build_example.into(),
            flags: Vec::new(),
            attrs: Vec::new(),
            ci_env: BTreeMap::new(),
            skip_test_platforms: Vec::new(),
        }
    }

    pub fn experimental(mut self) -> Self {
        self.experimental = true;
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<Attr>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ci_env.insert(key.into(), value.into());
        self
    }

    pub fn skip_platforms(mut self, platforms: &[Platform]) -> Self {
        self.skip_test_platforms.extend_from_slice(platforms);
        self
    }
}

// ============================================================================
// Languages
// ============================================================================

/// One target ecosystem and the rules generated for it
#[derive(Debug, Clone, Serialize)]
pub struct Language {
    /// Identifier used in generated symbols, task and target names
    pub name: String,
    /// Name used in prose
    pub display_name: String,
    /// Output directory relative to the scan root, `/`-separated
    pub dir: String,
    pub rules: Vec<Rule>,
    /// alias name -> rule name
    pub aliases: BTreeMap<String, String>,
    /// Flags inherited by every rule's example `.bazelrc`
    pub flags: Vec<Flag>,
    #[serde(skip)]
    pub notes: Option<Template>,
    pub ci_env: BTreeMap<String, String>,
    pub skip_test_platforms: Vec<Platform>,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            dir: dir.into(),
            rules: Vec::new(),
            aliases: BTreeMap::new(),
            flags: Vec::new(),
            notes: None,
            ci_env: BTreeMap::new(),
            skip_test_platforms: Vec::new(),
        }
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<Template>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ci_env.insert(key.into(), value.into());
        self
    }

    pub fn skip_platforms(mut self, platforms: &[Platform]) -> Self {
        self.skip_test_platforms.extend_from_slice(platforms);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Number of `/`-separated segments in [`Language::dir`]
    pub fn dir_depth(&self) -> usize {
        self.dir.split('/').count()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The complete, immutable collection of languages
#[derive(Debug, Clone)]
pub struct Registry {
    languages: Vec<Language>,
}

impl Registry {
    pub fn new(languages: Vec<Language>) -> Self {
        Self { languages }
    }

    /// The rule collection shipped with this generator
    pub fn builtin() -> Self {
        Self::new(languages::all())
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn language(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.name == name)
    }

    /// Every (language, rule) pair in registry order
    pub fn rules(&self) -> impl Iterator<Item = (&Language, &Rule)> {
        self.languages
            .iter()
            .flat_map(|lang| lang.rules.iter().map(move |rule| (lang, rule)))
    }
}
