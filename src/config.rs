use crate::archive::{REF_PLACEHOLDER, SHA256_PLACEHOLDER};
use crate::ci::platform::CiRunner;
use crate::error::GenerateError;
use crate::workspaces::{WorkspaceExclusions, default_workspace_exclusions};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DIR: &str = ".";
const DEFAULT_HEADER: &str = "tools/rulegen/README.header.md";
const DEFAULT_FOOTER: &str = "tools/rulegen/README.footer.md";
const DEFAULT_GITHUB_URL: &str =
    "https://github.com/rules-proto-grpc/rules_proto_grpc/archive/{ref}.tar.gz";
const DEFAULT_AVAILABLE_TESTS: &str = "available_tests.txt";
const DEFAULT_CI_PLATFORMS: &[&str] = &["ubuntu1804", "windows", "macos"];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Scan root; generated paths are relative to it
    pub dir: String,
    pub header: PathBuf,
    pub footer: PathBuf,
    pub git_ref: String,
    pub sha256: String,
    /// Archive download URL with a `{ref}` placeholder
    pub github_url: String,
    pub available_tests: PathBuf,
    /// CI runner names in task order
    pub ci_platforms: Vec<String>,
    pub workspace_exclusions: WorkspaceExclusions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_DIR.to_string(),
            header: PathBuf::from(DEFAULT_HEADER),
            footer: PathBuf::from(DEFAULT_FOOTER),
            git_ref: REF_PLACEHOLDER.to_string(),
            sha256: SHA256_PLACEHOLDER.to_string(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            available_tests: PathBuf::from(DEFAULT_AVAILABLE_TESTS),
            ci_platforms: DEFAULT_CI_PLATFORMS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            workspace_exclusions: default_workspace_exclusions(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            dir: cli_dir,
            header: cli_header,
            footer: cli_footer,
            git_ref: cli_ref,
            sha256: cli_sha256,
            github_url: cli_github_url,
            available_tests: cli_available_tests,
            ci_platforms: cli_ci_platforms,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            dir: file_dir,
            header: file_header,
            footer: file_footer,
            git_ref: file_ref,
            sha256: file_sha256,
            github_url: file_github_url,
            available_tests: file_available_tests,
            ci_platforms: file_ci_platforms,
            workspace_exclusions: file_workspace_exclusions,
        } = file_config;

        let defaults = Self::default();

        let ci_platforms = cli_ci_platforms
            .or(file_ci_platforms)
            .unwrap_or(defaults.ci_platforms)
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Ok(Self {
            dir: cli_dir.or(file_dir).unwrap_or(defaults.dir),
            header: cli_header.or(file_header).unwrap_or(defaults.header),
            footer: cli_footer.or(file_footer).unwrap_or(defaults.footer),
            git_ref: cli_ref.or(file_ref).unwrap_or(defaults.git_ref),
            sha256: cli_sha256.or(file_sha256).unwrap_or(defaults.sha256),
            github_url: cli_github_url
                .or(file_github_url)
                .unwrap_or(defaults.github_url),
            available_tests: cli_available_tests
                .or(file_available_tests)
                .unwrap_or(defaults.available_tests),
            ci_platforms,
            workspace_exclusions: file_workspace_exclusions
                .unwrap_or(defaults.workspace_exclusions),
        })
    }

    /// Fail fast on options that would otherwise surface mid-run.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.dir.trim().is_empty() {
            return Err(GenerateError::Config("--dir required".to_string()));
        }
        if !self.github_url.contains("{ref}") {
            return Err(GenerateError::Config(format!(
                "--github-url must contain a {{ref}} placeholder, got `{}`",
                self.github_url
            )));
        }
        if self.ci_platforms.is_empty() {
            return Err(GenerateError::Config(
                "at least one CI platform must be configured".to_string(),
            ));
        }
        self.ci_runners()?;
        Ok(())
    }

    /// Resolve the configured runner names, rejecting unknown and repeated ones.
    pub fn ci_runners(&self) -> Result<Vec<CiRunner>, GenerateError> {
        let mut runners: Vec<CiRunner> = Vec::with_capacity(self.ci_platforms.len());
        for name in &self.ci_platforms {
            let runner: CiRunner = name.parse().map_err(GenerateError::Config)?;
            if runners.contains(&runner) {
                return Err(GenerateError::Config(format!(
                    "CI runner `{runner}` is listed more than once"
                )));
            }
            runners.push(runner);
        }
        Ok(runners)
    }

    /// Scan root as a filesystem path
    pub fn root(&self) -> &Path {
        Path::new(&self.dir)
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "rulegen",
    about = "Generate rules, docs, examples and CI config for rules_proto_grpc",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, env = "RULEGEN_DIR", value_name = "DIR", help = "Directory to scan")]
    pub dir: Option<String>,

    #[arg(
        long,
        env = "RULEGEN_HEADER",
        value_name = "FILE",
        help = "Template for the main readme header"
    )]
    pub header: Option<PathBuf>,

    #[arg(
        long,
        env = "RULEGEN_FOOTER",
        value_name = "FILE",
        help = "Template for the main readme footer"
    )]
    pub footer: Option<PathBuf>,

    #[arg(
        long = "ref",
        env = "RULEGEN_REF",
        value_name = "REF",
        help = "Version ref to use for main readme"
    )]
    pub git_ref: Option<String>,

    #[arg(
        long,
        env = "RULEGEN_SHA256",
        value_name = "SHA256",
        help = "Sha256 value to use for main readme"
    )]
    pub sha256: Option<String>,

    #[arg(
        long,
        alias = "github_url",
        env = "RULEGEN_GITHUB_URL",
        value_name = "URL",
        help = "URL for github download, with a {ref} placeholder"
    )]
    pub github_url: Option<String>,

    #[arg(
        long,
        alias = "available_tests",
        env = "RULEGEN_AVAILABLE_TESTS",
        value_name = "FILE",
        help = "File containing the list of available routeguide tests"
    )]
    pub available_tests: Option<PathBuf>,

    #[arg(
        long,
        alias = "ci_platforms",
        env = "RULEGEN_CI_PLATFORMS",
        value_name = "RUNNER",
        value_delimiter = ',',
        help = "Comma-separated list of CI runners to generate tasks for"
    )]
    pub ci_platforms: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    dir: Option<String>,
    header: Option<PathBuf>,
    footer: Option<PathBuf>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    sha256: Option<String>,
    github_url: Option<String>,
    available_tests: Option<PathBuf>,
    ci_platforms: Option<Vec<String>>,
    workspace_exclusions: Option<WorkspaceExclusions>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
