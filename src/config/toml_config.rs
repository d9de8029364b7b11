use crate::core::report::{DEFAULT_PODIUM_PLACES, MAX_CHART_WIDTH};
use crate::core::{ConfigProvider, ExportFormat};
use crate::utils::error::{Result, TastingError};
use crate::utils::validation::{validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_KNOWN_SAMPLES_FILE: &str = "known_gins.txt";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_CHART_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TastingConfig {
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub known_samples_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub default_format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub chart_width: usize,
    pub podium_places: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            known_samples_file: DEFAULT_KNOWN_SAMPLES_FILE.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            default_format: ExportFormat::Excel,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_width: DEFAULT_CHART_WIDTH,
            podium_places: DEFAULT_PODIUM_PLACES,
        }
    }
}

impl TastingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TastingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let table: toml::Table = toml::from_str(&processed_content).map_err(toml_error)?;
        // 格式字串先走 FromStr，錯誤才會是 UnsupportedFormat
        if let Some(format) = table
            .get("export")
            .and_then(|export| export.get("default_format"))
            .and_then(|format| format.as_str())
        {
            format.parse::<ExportFormat>()?;
        }

        toml::from_str(&processed_content).map_err(toml_error)
    }

    /// 替換環境變數 (例如 ${TASTING_OUTPUT})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TastingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數覆蓋檔案設定
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(path) = &cli.output_path {
            self.export.output_path = path.clone();
        }
        if let Some(file) = &cli.known_samples {
            self.catalog.known_samples_file = file.clone();
        }
        if let Some(format) = cli.format {
            self.export.default_format = format;
        }
    }

    /// 有指定檔案就載入，否則使用預設值，最後套用命令列參數
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &crate::config::CliConfig) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_cli_overrides(cli);
        Ok(config)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("catalog.known_samples_file", &self.catalog.known_samples_file)?;
        validate_path("export.output_path", &self.export.output_path)?;
        validate_range("display.chart_width", self.display.chart_width, 1, MAX_CHART_WIDTH)?;
        validate_range("display.podium_places", self.display.podium_places, 1, 20)?;
        Ok(())
    }
}

fn toml_error(e: toml::de::Error) -> TastingError {
    TastingError::ConfigError {
        message: format!("TOML parsing error: {}", e),
    }
}

impl ConfigProvider for TastingConfig {
    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn known_samples_file(&self) -> &str {
        &self.catalog.known_samples_file
    }

    fn default_format(&self) -> ExportFormat {
        self.export.default_format
    }

    fn chart_width(&self) -> usize {
        self.display.chart_width
    }

    fn podium_places(&self) -> usize {
        self.display.podium_places
    }
}

impl Validate for TastingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
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
[catalog]
known_samples_file = "data/gins.txt"

[export]
output_path = "./results"
default_format = "csv"

[display]
chart_width = 30
podium_places = 5
"#;

        let config = TastingConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.known_samples_file(), "data/gins.txt");
        assert_eq!(config.output_path(), "./results");
        assert_eq!(config.default_format(), ExportFormat::Csv);
        assert_eq!(config.chart_width(), 30);
        assert_eq!(config.podium_places(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TastingConfig::from_toml_str("[export]\noutput_path = \"out\"\n").unwrap();

        assert_eq!(config.output_path(), "out");
        assert_eq!(config.default_format(), ExportFormat::Excel);
        assert_eq!(config.known_samples_file(), DEFAULT_KNOWN_SAMPLES_FILE);
        assert_eq!(config.podium_places(), DEFAULT_PODIUM_PLACES);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GIN_TASTING_TEST_OUTPUT", "/tmp/tasting");

        let config = TastingConfig::from_toml_str(
            "[export]\noutput_path = \"${GIN_TASTING_TEST_OUTPUT}\"\n",
        )
        .unwrap();
        assert_eq!(config.output_path(), "/tmp/tasting");

        std::env::remove_var("GIN_TASTING_TEST_OUTPUT");
    }

    #[test]
    fn test_default_format_aliases() {
        let config = TastingConfig::from_toml_str("[export]\ndefault_format = \"xlsx\"\n").unwrap();
        assert_eq!(config.default_format(), ExportFormat::Excel);

        let config = TastingConfig::from_toml_str("[export]\ndefault_format = \"CSV\"\n").unwrap();
        assert_eq!(config.default_format(), ExportFormat::Csv);
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let err = TastingConfig::from_toml_str("[export]\ndefault_format = \"pdf\"\n").unwrap_err();
        match err {
            TastingError::UnsupportedFormat(raw) => assert_eq!(raw, "pdf"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }

        // 其他語法錯誤仍然是 ConfigError
        let err = TastingConfig::from_toml_str("[export\n").unwrap_err();
        assert!(matches!(err, TastingError::ConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = TastingConfig::default();
        assert!(config.validate().is_ok());

        config.display.chart_width = 0;
        assert!(config.validate().is_err());

        config.display.chart_width = MAX_CHART_WIDTH + 1;
        assert!(matches!(
            config.validate(),
            Err(TastingError::InvalidConfiguration { .. })
        ));

        config.display.chart_width = MAX_CHART_WIDTH;
        assert!(config.validate().is_ok());

        config.display.chart_width = 10;
        config.export.output_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[display]\nchart_width = 12\n")
            .unwrap();

        let config = TastingConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.chart_width(), 12);
    }
}
