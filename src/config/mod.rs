pub mod catalog_config;
pub mod cli;

pub use catalog_config::CatalogConfig;
pub use cli::LocalStorage;

#[cfg(feature = "cli")]
use crate::domain::model::{ClientInfo, Customization};
#[cfg(feature = "cli")]
use crate::utils::error::{PackagerError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "agency-packager")]
#[command(about = "Price, schedule and propose agency service packages")]
pub struct CliConfig {
    /// Path to the TOML service catalog
    #[arg(short, long, default_value = "catalog.toml")]
    pub catalog: String,

    /// Package template to apply
    #[arg(short, long)]
    pub template: Option<String>,

    /// Services to include, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub services: Vec<String>,

    #[arg(long, default_value = "Prospective Client")]
    pub business_name: String,

    #[arg(long, default_value = "small business")]
    pub industry: String,

    #[arg(long)]
    pub contact_name: Option<String>,

    /// Override the package display name
    #[arg(long)]
    pub name: Option<String>,

    /// Project start date (YYYY-MM-DD) for calendar dates in the timeline
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Override the output directory from the catalog
    #[arg(long)]
    pub output_path: Option<String>,

    /// List the services and templates in the catalog and exit
    #[arg(long)]
    pub list: bool,

    /// Compute and print the package without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Log as JSON instead of compact text
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn template_id(&self) -> Result<&str> {
        self.template
            .as_deref()
            .ok_or_else(|| PackagerError::invalid_input("--template is required"))
    }

    pub fn customization(&self) -> Option<Customization> {
        if self.name.is_none() && self.start_date.is_none() {
            return None;
        }
        Some(Customization {
            name: self.name.clone(),
            start_date: self.start_date,
        })
    }

    pub fn client_info(&self) -> ClientInfo {
        ClientInfo {
            business_name: self.business_name.clone(),
            industry: self.industry.clone(),
            contact_name: self.contact_name.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("catalog", &self.catalog)?;
        if let Some(path) = &self.output_path {
            validate_path("output_path", path)?;
        }
        if self.list {
            return Ok(());
        }
        validate_non_empty_string("template", self.template_id()?)?;
        if self.services.is_empty() {
            return Err(PackagerError::invalid_input("--services needs at least one service"));
        }
        validate_non_empty_string("business_name", &self.business_name)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_arguments() {
        let config = CliConfig::parse_from([
            "agency-packager",
            "--template",
            "launch",
            "--services",
            "brand,web",
            "--start-date",
            "2026-03-02",
            "--business-name",
            "Acme Bakery",
        ]);

        assert_eq!(config.services, vec!["brand", "web"]);
        assert_eq!(config.template_id().unwrap(), "launch");
        assert!(config.validate().is_ok());
        let custom = config.customization().unwrap();
        assert_eq!(custom.start_date, NaiveDate::from_ymd_opt(2026, 3, 2));
        assert_eq!(config.client_info().business_name, "Acme Bakery");
    }

    #[test]
    fn test_missing_services_rejected() {
        let config = CliConfig::parse_from(["agency-packager", "--template", "launch"]);
        assert!(config.validate().is_err());
        assert!(config.customization().is_none());
    }

    #[test]
    fn test_list_needs_no_template() {
        let config = CliConfig::parse_from(["agency-packager", "--list"]);
        assert!(config.validate().is_ok());
    }
}
