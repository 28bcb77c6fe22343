use super::{Flag, Language, Registry};
use crate::error::RegistryError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// True if `name` can be used both as a file stem and a Starlark symbol.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

impl Registry {
    /// Check the structural invariants every emitter relies on.
    ///
    /// Runs before any file is written so a malformed entry fails the run up
    /// front instead of surfacing as a template error inside one emitter.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.languages.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut names = HashSet::new();
        let mut dirs: HashMap<&str, &str> = HashMap::new();
        for lang in &self.languages {
            identifier(&lang.name, || "language name".to_string())?;
            if !names.insert(lang.name.as_str()) {
                return Err(RegistryError::DuplicateLanguage {
                    name: lang.name.clone(),
                });
            }
            check_dir(lang)?;
            if let Some(first) = dirs.insert(lang.dir.as_str(), lang.name.as_str()) {
                return Err(RegistryError::DuplicateDir {
                    dir: lang.dir.clone(),
                    first: first.to_string(),
                    second: lang.name.clone(),
                });
            }
            check_flags(&lang.flags, &lang.name)?;
            check_rules(lang)?;
            check_aliases(lang)?;
        }
        Ok(())
    }
}

fn identifier(name: &str, context: impl FnOnce() -> String) -> Result<(), RegistryError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidIdentifier {
            name: name.to_string(),
            context: context(),
        })
    }
}

fn check_dir(lang: &Language) -> Result<(), RegistryError> {
    let valid = lang
        .dir
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidDir {
            language: lang.name.clone(),
            dir: lang.dir.clone(),
        })
    }
}

fn check_flags(flags: &[Flag], owner: &str) -> Result<(), RegistryError> {
    match flags.iter().find(|flag| flag.name.trim().is_empty()) {
        Some(_) => Err(RegistryError::EmptyFlagName {
            owner: owner.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_rules(lang: &Language) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for rule in &lang.rules {
        identifier(&rule.name, || format!("rule in language `{}`", lang.name))?;
        if !seen.insert(rule.name.as_str()) {
            return Err(RegistryError::DuplicateRule {
                language: lang.name.clone(),
                rule: rule.name.clone(),
            });
        }
        check_flags(&rule.flags, &rule.name)?;
    }
    Ok(())
}

fn check_aliases(lang: &Language) -> Result<(), RegistryError> {
    for (alias, target) in &lang.aliases {
        identifier(alias, || format!("alias in language `{}`", lang.name))?;
        if lang.rule(alias).is_some() {
            return Err(RegistryError::AliasShadowsRule {
                language: lang.name.clone(),
                alias: alias.clone(),
            });
        }
        if lang.rule(target).is_none() {
            return Err(RegistryError::DanglingAlias {
                language: lang.name.clone(),
                alias: alias.clone(),
                target: target.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Flag, Rule};
    use assert_matches::assert_matches;

    fn rule(name: &str) -> Rule {
        Rule::new(name, "doc", "", "", "")
    }

    fn cpp() -> Language {
        Language::new("cpp", "C++", "cpp").with_rules(vec![rule("cpp_proto_compile")])
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        assert_eq!(Registry::builtin().validate(), Ok(()));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("cpp_grpc_library"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("grpc-web"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(Registry::new(vec![]).validate(), Err(RegistryError::Empty));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let lang = cpp().with_rules(vec![rule("cpp_proto_compile"), rule("cpp_proto_compile")]);
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::DuplicateRule { rule, .. }) if rule == "cpp_proto_compile"
        );
    }

    #[test]
    fn test_dangling_alias_rejected() {
        let lang = cpp().with_alias("cc_proto_compile", "cpp_grpc_compile");
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::DanglingAlias { target, .. }) if target == "cpp_grpc_compile"
        );
    }

    #[test]
    fn test_alias_shadowing_rule_rejected() {
        let lang = cpp().with_alias("cpp_proto_compile", "cpp_proto_compile");
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::AliasShadowsRule { .. })
        );
    }

    #[test]
    fn test_duplicate_dir_rejected() {
        let other = Language::new("cc", "C", "cpp");
        assert_matches!(
            Registry::new(vec![cpp(), other]).validate(),
            Err(RegistryError::DuplicateDir { first, second, .. }) if first == "cpp" && second == "cc"
        );
    }

    #[test]
    fn test_invalid_dir_rejected() {
        let lang = Language::new("cpp", "C++", "../cpp");
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::InvalidDir { .. })
        );
    }

    #[test]
    fn test_invalid_rule_name_rejected() {
        let lang = cpp().with_rules(vec![rule("cpp-proto")]);
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::InvalidIdentifier { name, .. }) if name == "cpp-proto"
        );
    }

    #[test]
    fn test_empty_flag_name_rejected() {
        let lang = cpp().with_flag(Flag::build("", "x", ""));
        assert_matches!(
            Registry::new(vec![lang]).validate(),
            Err(RegistryError::EmptyFlagName { owner }) if owner == "cpp"
        );
    }
}
