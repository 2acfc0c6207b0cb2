use crate::app::export::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "qb-terms")]
#[command(about = "List the standard payment terms of an accounting company file")]
pub struct CliArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "JSON company snapshot served by the in-memory engine")]
    pub company_data: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Application name reported when opening the connection")]
    pub app_name: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliArgs {
    /// Loads the config file (if any) and applies command-line overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(company_data) = &self.company_data {
            config.source.company_data = Some(company_data.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(app_name) = &self.app_name {
            config.gateway.app_name = app_name.clone();
        }

        Ok(config)
    }
}
