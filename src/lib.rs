pub mod archive;
pub mod ci;
pub mod config;
pub mod emit;
pub mod error;
pub mod logging;
pub mod registry;
pub mod render;
pub mod utils;
pub mod workspaces;

pub use config::{CliArgs, GeneratorConfig};
pub use error::{GenerateError, RegistryError};
pub use logging::{LoggingConfig, init_logging};
pub use registry::Registry;

use ci::matrix::CiMatrixBuilder;
use emit::docs::ReadmeData;
use workspaces::{AllowList, find_test_workspaces};

/// Regenerate every artifact under `config.dir` from `registry`.
///
/// The configuration and the registry are validated and every input file is
/// read before the first write. After that the first failure aborts the run;
/// files already written stay on disk.
pub fn generate(config: &GeneratorConfig, registry: &Registry) -> Result<(), GenerateError> {
    config.validate()?;
    registry.validate()?;

    let span = logging::generation_span(&config.dir, &config.git_ref);
    let _entered = span.enter();

    let root = config.root();
    let runners = config.ci_runners()?;
    let allow_list = AllowList::load(&config.available_tests)?;
    let test_workspaces = find_test_workspaces(root)?;

    for lang in registry.languages() {
        emit::docs::write_language_readme(root, lang)?;
        emit::rules::write_defs(root, lang)?;
        emit::rules::write_rules(root, lang)?;
        emit::examples::write_examples(root, lang)?;
        tracing::debug!(language = %lang.name, rules = lang.rules.len(), "generated language");
    }
    tracing::info!(languages = registry.languages().len(), "generated rules, docs and examples");

    let readme_data = ReadmeData {
        git_ref: config.git_ref.clone(),
        sha256: config.sha256.clone(),
    };
    emit::docs::write_readme(root, registry, &config.header, &config.footer, &readme_data)?;

    let matrix = CiMatrixBuilder::new(registry, &runners, &allow_list)
        .root(config.dir.clone())
        .workspaces(&test_workspaces, &config.workspace_exclusions)
        .build()?;
    ci::presubmit::write_presubmit(root, &matrix)?;

    emit::makefile::write_examples_makefile(root, registry, &config.dir)?;
    emit::makefile::write_workspaces_makefile(root, &test_workspaces, &config.dir)?;
    emit::examples::write_http_archive_workspace(
        root,
        &config.github_url,
        &config.git_ref,
        &config.sha256,
    )?;

    tracing::info!(
        test_workspaces = test_workspaces.len(),
        allow_listed_tests = allow_list.len(),
        "generation complete"
    );
    Ok(())
}
