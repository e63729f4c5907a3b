use crate::config::toml_config::{LogFormat, ReportConfig};
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "sales-tax-report")]
#[command(about = "Quarterly sales tax report and CSV export for a single billing region")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Order export to read (overrides source.orders_file)
    #[arg(long)]
    pub orders: Option<String>,

    /// Billing region code to report on (overrides report.region_code)
    #[arg(long)]
    pub region: Option<String>,

    /// Export filename prefix (overrides report.filename_prefix)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the quarterly summary on the terminal
    Show {
        /// Quarter 1-4 (defaults to the current quarter)
        #[arg(short, long)]
        quarter: Option<u32>,

        /// Calendar year (defaults to the current year)
        #[arg(short, long, allow_negative_numbers = true)]
        year: Option<i32>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write the quarterly CSV export to the output directory
    Export {
        /// Quarter 1-4 (defaults to the current quarter)
        #[arg(short, long)]
        quarter: Option<u32>,

        /// Calendar year (defaults to the current year)
        #[arg(short, long, allow_negative_numbers = true)]
        year: Option<i32>,

        /// Output directory (overrides output.output_path)
        #[arg(short, long)]
        output: Option<String>,

        /// Write the CSV to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
}

impl Cli {
    /// Loads the configuration file when given (or `sales-tax.toml` when it
    /// exists), then applies command line overrides.
    pub fn load_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None if Path::new("sales-tax.toml").exists() => {
                ReportConfig::from_file("sales-tax.toml")?
            }
            None => ReportConfig::default(),
        };

        if let Some(orders) = &self.orders {
            config.source.orders_file = orders.clone();
        }
        if let Some(region) = &self.region {
            if config.report.region_code != *region {
                // 換了地區，舊的州名不再適用
                config.report.jurisdiction = None;
            }
            config.report.region_code = region.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.report.filename_prefix = prefix.clone();
        }
        if let Command::Export {
            output: Some(output),
            ..
        } = &self.command
        {
            config.output.output_path = output.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }

        Ok(config)
    }
}
