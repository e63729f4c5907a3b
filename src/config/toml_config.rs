use crate::core::report_service::ReportSettings;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub region_code: String,
    /// Human readable jurisdiction name shown in summaries; defaults to the region code.
    pub jurisdiction: Option<String>,
    pub filename_prefix: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        let settings = ReportSettings::default();
        Self {
            region_code: settings.region_code,
            jurisdiction: Some("Massachusetts".to_string()),
            filename_prefix: settings.filename_prefix,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub orders_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            orders_file: "./orders.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub verbose: bool,
}

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ReportError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORDERS_FILE})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            region_code: self.report.region_code.clone(),
            filename_prefix: self.report.filename_prefix.clone(),
        }
    }

    pub fn jurisdiction(&self) -> &str {
        self.report
            .jurisdiction
            .as_deref()
            .unwrap_or(&self.report.region_code)
    }

    pub fn orders_file(&self) -> &str {
        &self.source.orders_file
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_region_code("report.region_code", &self.report.region_code)?;
        validation::validate_filename_prefix("report.filename_prefix", &self.report.filename_prefix)?;
        if let Some(name) = &self.report.jurisdiction {
            validation::validate_non_empty_string("report.jurisdiction", name)?;
        }
        validation::validate_path("source.orders_file", &self.source.orders_file)?;
        validation::validate_path("output.output_path", &self.output.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[report]
region_code = "NH"
jurisdiction = "New Hampshire"
filename_prefix = "nh-sales-tax"

[source]
orders_file = "/data/orders.csv"

[output]
output_path = "/data/exports"

[logging]
format = "json"
verbose = true
"#;

        let config = ReportConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.settings().region_code, "NH");
        assert_eq!(config.settings().filename_prefix, "nh-sales-tax");
        assert_eq!(config.jurisdiction(), "New Hampshire");
        assert_eq!(config.orders_file(), "/data/orders.csv");
        assert_eq!(config.output_path(), "/data/exports");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ReportConfig::from_toml_str("").unwrap();

        assert_eq!(config.settings(), ReportSettings::default());
        assert_eq!(config.jurisdiction(), "Massachusetts");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_jurisdiction_falls_back_to_region_code() {
        let toml_content = r#"
[report]
region_code = "VT"
filename_prefix = "vt-sales-tax"
"#;

        let config = ReportConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.jurisdiction(), "VT");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SALES_TAX_TEST_ORDERS", "/tmp/orders-from-env.csv");

        let toml_content = r#"
[source]
orders_file = "${SALES_TAX_TEST_ORDERS}"
"#;

        let config = ReportConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.orders_file(), "/tmp/orders-from-env.csv");

        std::env::remove_var("SALES_TAX_TEST_ORDERS");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[report]
region_code = "MA"
filename_prefix = "../../etc/report"
"#;

        let config = ReportConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ReportError::InvalidConfigValueError { field, .. }) if field == "report.filename_prefix"
        ));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            ReportConfig::from_toml_str("[report\nregion_code = 1"),
            Err(ReportError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\noutput_path = \"./quarterly\"\n")
            .unwrap();

        let config = ReportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./quarterly");
    }

    #[test]
    fn test_demo_config_loads_without_environment() {
        let demo = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/sales-tax.toml");

        let config = ReportConfig::from_file(demo).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.orders_file(), "demos/orders.csv");
        assert_eq!(config.jurisdiction(), "Massachusetts");
    }
}
