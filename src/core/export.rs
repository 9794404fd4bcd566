use crate::domain::model::{Package, Proposal};
use crate::utils::error::{PackagerError, Result};
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

pub const PACKAGE_FILE: &str = "package.json";
pub const SCHEDULE_FILE: &str = "schedule.csv";
pub const PROPOSAL_FILE: &str = "proposal.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub const NAMES: [&'static str; 3] = ["json", "csv", "markdown"];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => PACKAGE_FILE,
            ExportFormat::Csv => SCHEDULE_FILE,
            ExportFormat::Markdown => PROPOSAL_FILE,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PackagerError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(PackagerError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    Self::NAMES.join(", ")
                ),
            }),
        }
    }
}

/// 輸出哪些檔案，以及是否另外打包成 zip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub formats: Vec<ExportFormat>,
    pub bundle_filename: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown],
            bundle_filename: None,
        }
    }
}

pub fn package_json(package: &Package) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(package)?)
}

/// 每項服務一列的交付時程
pub fn schedule_csv(package: &Package) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "service_id",
        "name",
        "start_day",
        "end_day",
        "start_date",
        "end_date",
        "critical",
    ])?;

    for entry in &package.timeline.schedule {
        let critical = package.timeline.critical_path.contains(&entry.service_id);
        writer.write_record([
            entry.service_id.clone(),
            entry.name.clone(),
            entry.start_day.to_string(),
            entry.end_day.to_string(),
            entry.start_date.map(|d| d.to_string()).unwrap_or_default(),
            entry.end_date.map(|d| d.to_string()).unwrap_or_default(),
            critical.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| PackagerError::IoError(e.into_error()))
}

/// 依設定產生 (檔名, 內容) 清單
pub fn render_files(
    package: &Package,
    proposal: &Proposal,
    settings: &ExportSettings,
) -> Result<Vec<(&'static str, Vec<u8>)>> {
    settings
        .formats
        .iter()
        .map(|format| -> Result<(&'static str, Vec<u8>)> {
            let data = match format {
                ExportFormat::Json => package_json(package)?,
                ExportFormat::Csv => schedule_csv(package)?,
                ExportFormat::Markdown => proposal.to_markdown().into_bytes(),
            };
            Ok((format.file_name(), data))
        })
        .collect()
}

pub fn bundle_zip(files: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(*name, FileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_bundle_zip_contains_files() {
        let files = vec![("a.txt", b"hello".to_vec()), ("b.txt", b"world".to_vec())];
        let data = bundle_zip(&files).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("b.txt").unwrap(), &mut content)
            .unwrap();
        assert_eq!(content, "world");
    }
}
