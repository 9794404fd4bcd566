use crate::core::catalog::Catalog;
use crate::core::export::{ExportFormat, ExportSettings};
use crate::core::CatalogProvider;
use crate::domain::model::{CopyTemplate, PackageTemplate, Service};
use crate::utils::error::{PackagerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_OUTPUT_PATH: &str = "./proposals";

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub agency: AgencyConfig,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub templates: Vec<PackageTemplate>,
    #[serde(default)]
    pub copy: HashMap<String, CopyTemplate>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Option<Vec<String>>,
    pub bundle: Option<BundleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: String,
}

impl CatalogConfig {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PackagerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析目錄
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PackagerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AGENCY_NAME})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證設定並確認目錄本身一致
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("agency.name", &self.agency.name)?;

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
            if let Some(bundle) = output.bundle.as_ref().filter(|b| b.enabled) {
                validate_path("output.bundle.filename", &bundle.filename)?;
            }
        }
        self.export_settings()?;

        Catalog::from_provider(self)?;
        Ok(())
    }

    /// 建立計算用的目錄
    pub fn build_catalog(&self) -> Result<Catalog> {
        Catalog::from_provider(self)
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .map(|o| o.path.as_str())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn export_settings(&self) -> Result<ExportSettings> {
        let Some(output) = &self.output else {
            return Ok(ExportSettings::default());
        };

        let formats = match &output.formats {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<ExportFormat>())
                .collect::<Result<Vec<_>>>()?,
            None => ExportSettings::default().formats,
        };

        Ok(ExportSettings {
            formats,
            bundle_filename: output
                .bundle
                .as_ref()
                .filter(|b| b.enabled)
                .map(|b| b.filename.clone()),
        })
    }
}

impl CatalogProvider for CatalogConfig {
    fn services(&self) -> &[Service] {
        &self.services
    }

    fn templates(&self) -> &[PackageTemplate] {
        &self.templates
    }

    fn copy_templates(&self) -> &HashMap<String, CopyTemplate> {
        &self.copy
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
