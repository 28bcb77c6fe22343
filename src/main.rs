use clap::Parser;
use rulegen::{
    CliArgs, GenerateError, GeneratorConfig, LoggingConfig, Registry, archive, generate,
    init_logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let result = run(CliArgs::parse()).await;
    if let Err(err) = &result {
        match err.downcast_ref::<GenerateError>() {
            Some(generate_err) => {
                tracing::error!(category = %generate_err.category(), error = %err, "rulegen failed")
            }
            None => tracing::error!(error = %format!("{err:#}"), "rulegen failed"),
        }
    }
    result
}

async fn run(cli: CliArgs) -> anyhow::Result<()> {
    let mut config = GeneratorConfig::from_args(cli)?;

    // Validate configuration before any network or filesystem work (fail-fast)
    config.validate()?;

    config.sha256 =
        archive::resolve_sha256(&config.github_url, &config.git_ref, &config.sha256).await?;

    let registry = Registry::builtin();
    generate(&config, &registry)?;
    Ok(())
}
