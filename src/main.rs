use anyhow::Result;
use clap::Parser;
use hireflow::app_log;
use hireflow::cli::{handle_command, HireflowCli};
use hireflow::logging::init_logging;
use hireflow::{EnvironmentConfig, ServiceClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = HireflowCli::parse();

    let config = EnvironmentConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_file())?;

    app_log!(info, "Environment: {}", EnvironmentConfig::get_environment());
    match &config.source {
        Some(path) => app_log!(info, "Configuration loaded from {}", path.display()),
        None => app_log!(info, "No config file found, using environment variables only"),
    }
    app_log!(info, "API: {}", config.api_url);
    app_log!(info, "App: {}", config.app_url);

    let client = ServiceClient::from_config(&config)?;
    let result = handle_command(cli.command, &config, client).await;
    if let Err(e) = &result {
        app_log!(error, "Command failed: {:#}", e);
    }
    result
}
