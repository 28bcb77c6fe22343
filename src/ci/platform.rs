//! Logical platforms, the CI runners that implement them, and the Platform
//! Filter deciding whether a language or rule is tested on a runner.

use crate::registry::{Language, Rule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating-system family a runner belongs to.
///
/// Exclusions are declared against families; every runner of a family shares
/// the same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    Macos,
}

const LINUX_RUNNERS: &[&str] = &["ubuntu1604", "ubuntu1804", "rbe_ubuntu1604", "rbe_ubuntu1804"];
const WINDOWS_RUNNERS: &[&str] = &["windows"];
const MACOS_RUNNERS: &[&str] = &["macos"];

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Windows, Platform::Macos];

    /// Concrete CI runner names belonging to this family
    pub fn runners(self) -> &'static [&'static str] {
        match self {
            Platform::Linux => LINUX_RUNNERS,
            Platform::Windows => WINDOWS_RUNNERS,
            Platform::Macos => MACOS_RUNNERS,
        }
    }

    pub fn for_runner(runner: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.runners().contains(&runner))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
            Platform::Macos => write!(f, "macos"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::Macos),
            other => Err(format!("unknown platform `{other}`")),
        }
    }
}

/// A named CI runner resolved to its platform family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiRunner {
    pub name: String,
    pub platform: Platform,
}

impl CiRunner {
    pub fn is_macos(&self) -> bool {
        self.platform == Platform::Macos
    }
}

impl FromStr for CiRunner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let platform = Platform::for_runner(name).ok_or_else(|| {
            format!("unknown CI runner `{name}`; expected one of the linux, windows or macos runners")
        })?;
        Ok(Self {
            name: name.to_string(),
            platform,
        })
    }
}

impl fmt::Display for CiRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Should CI tasks for `lang` (and optionally one of its rules) run on `platform`?
///
/// A language is skipped on the platforms it lists. A rule is skipped when it
/// is experimental, when its language is skipped, or on the platforms it lists
/// itself.
pub fn should_run(lang: &Language, rule: Option<&Rule>, platform: Platform) -> bool {
    if lang.skip_test_platforms.contains(&platform) {
        return false;
    }
    match rule {
        None => true,
        Some(rule) => !rule.experimental && !rule.skip_test_platforms.contains(&platform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> Rule {
        Rule::new("php_grpc_compile", "doc", "", "", "")
    }

    #[test]
    fn test_runner_families() {
        assert_eq!(Platform::for_runner("rbe_ubuntu1604"), Some(Platform::Linux));
        assert_eq!(Platform::for_runner("ubuntu1804"), Some(Platform::Linux));
        assert_eq!(Platform::for_runner("windows"), Some(Platform::Windows));
        assert_eq!(Platform::for_runner("macos"), Some(Platform::Macos));
        assert_eq!(Platform::for_runner("freebsd"), None);
    }

    #[test]
    fn test_runner_parse() {
        let runner: CiRunner = " ubuntu1804 ".parse().unwrap();
        assert_eq!(runner.name, "ubuntu1804");
        assert_eq!(runner.platform, Platform::Linux);
        assert!("solaris".parse::<CiRunner>().is_err());
    }

    #[test]
    fn test_language_exclusion_covers_its_rules() {
        let lang = Language::new("php", "PHP", "php").skip_platforms(&[Platform::Windows]);
        assert!(!should_run(&lang, None, Platform::Windows));
        assert!(!should_run(&lang, Some(&rule()), Platform::Windows));
        assert!(should_run(&lang, None, Platform::Linux));
        assert!(should_run(&lang, Some(&rule()), Platform::Macos));
    }

    #[test]
    fn test_rule_exclusion_is_per_platform() {
        let lang = Language::new("php", "PHP", "php");
        let rule = rule().skip_platforms(&[Platform::Macos]);
        assert!(!should_run(&lang, Some(&rule), Platform::Macos));
        assert!(should_run(&lang, Some(&rule), Platform::Linux));
        assert!(should_run(&lang, Some(&rule), Platform::Windows));
        assert!(should_run(&lang, None, Platform::Macos));
    }

    #[test]
    fn test_experimental_rule_never_runs() {
        let lang = Language::new("php", "PHP", "php");
        let rule = rule().experimental();
        for platform in Platform::ALL {
            assert!(!should_run(&lang, Some(&rule), platform));
        }
        assert!(should_run(&lang, None, Platform::Linux));
    }
}
