use crate::core::export::{bundle_zip, render_files, ExportSettings};
use crate::core::packager::PackageCalculator;
use crate::core::Storage;
use crate::domain::model::{ClientInfo, Customization, Package, Proposal};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// 一次完整的執行：建立套裝 → 產生提案 → 輸出檔案
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub template_id: String,
    pub service_ids: Vec<String>,
    pub customization: Option<Customization>,
    pub client: ClientInfo,
}

#[derive(Debug, Clone)]
pub struct PackagingOutcome {
    pub package: Package,
    pub proposal: Proposal,
    pub written: Vec<String>,
}

pub struct PackagingEngine<S: Storage> {
    calculator: PackageCalculator,
    storage: S,
    settings: ExportSettings,
}

impl<S: Storage> PackagingEngine<S> {
    pub fn new(calculator: PackageCalculator, storage: S, settings: ExportSettings) -> Self {
        Self {
            calculator,
            storage,
            settings,
        }
    }

    pub fn calculator(&self) -> &PackageCalculator {
        &self.calculator
    }

    /// 客戶資料先行檢查，不合格時不會建立套裝；
    /// 套裝建立後若寫檔失敗，套裝仍保留在計算器中
    pub async fn run(&mut self, request: &PackageRequest) -> Result<PackagingOutcome> {
        request.client.validate()?;

        tracing::info!(
            "Building '{}' with services [{}]",
            request.template_id,
            request.service_ids.join(", ")
        );

        let package = self.calculator.create_package(
            &request.template_id,
            &request.service_ids,
            request.customization.as_ref(),
        )?;
        let proposal = self
            .calculator
            .generate_proposal(&package.id, &request.client)?;

        let files = render_files(&package, &proposal, &self.settings)?;
        let mut written = Vec::new();

        match &self.settings.bundle_filename {
            Some(bundle) => {
                tracing::debug!("Creating ZIP bundle with {} files", files.len());
                let data = bundle_zip(&files)?;
                self.storage.write_file(bundle, &data).await?;
                written.push(bundle.clone());
            }
            None => {
                for (name, data) in &files {
                    self.storage.write_file(name, data).await?;
                    written.push(name.to_string());
                }
            }
        }

        tracing::info!("💾 Wrote {}", written.join(", "));

        Ok(PackagingOutcome {
            package,
            proposal,
            written,
        })
    }
}
