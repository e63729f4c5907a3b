use anyhow::Context;
use clap::Parser;
use sales_tax_report::app::{JsonPresenter, TextPresenter};
use sales_tax_report::config::{Command, LogFormat, OutputFormat};
use sales_tax_report::core::Storage;
use sales_tax_report::utils::error::{ErrorSeverity, ReportError};
use sales_tax_report::utils::{logger, validation::Validate};
use sales_tax_report::{Cli, CsvExport, CsvOrderStore, LocalStorage, ReportConfig, ReportService};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 載入配置 (檔案 + 命令列覆蓋)
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(config.logging.verbose),
        LogFormat::Json => logger::init_json_logger(config.logging.verbose),
    }
    tracing::debug!("Effective config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = CsvOrderStore::new(config.orders_file());
    let service = ReportService::new(store, config.settings());

    let outcome = match cli.command {
        Command::Show {
            quarter,
            year,
            format,
        } => show(&service, &config, quarter, year, format),
        Command::Export {
            quarter,
            year,
            stdout,
            ..
        } => match service.export(quarter, year) {
            Ok(export) if stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(&export.content)
                    .and_then(|_| out.flush())
                    .context("failed to write CSV export to stdout")?;
                Ok(())
            }
            Ok(export) => save_export(&config, &export).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = outcome {
        exit_with(e);
    }

    Ok(())
}

fn show(
    service: &ReportService<CsvOrderStore>,
    config: &ReportConfig,
    quarter: Option<u32>,
    year: Option<i32>,
    format: OutputFormat,
) -> sales_tax_report::Result<()> {
    let stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Text => {
            let mut presenter = TextPresenter::new(stdout, config.jurisdiction());
            service.display(quarter, year, &mut presenter)?;
        }
        OutputFormat::Json => {
            let mut presenter = JsonPresenter::new(stdout, config.settings().region_code);
            service.display(quarter, year, &mut presenter)?;
        }
    }
    Ok(())
}

async fn save_export(config: &ReportConfig, export: &CsvExport) -> sales_tax_report::Result<()> {
    let storage = LocalStorage::new(config.output_path());
    storage.write_file(&export.filename, &export.content).await?;

    let saved_to = storage.resolve(&export.filename);
    tracing::info!("✅ Export for {} written", export.period);
    tracing::info!("📁 Output saved to: {}", saved_to.display());
    println!("📁 {}", saved_to.display());
    Ok(())
}

fn exit_with(e: ReportError) -> ! {
    tracing::error!(
        "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
