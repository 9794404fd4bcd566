use crate::domain::model::{CopyTemplate, PackageTemplate, Service};
use crate::utils::error::Result;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 服務與模板目錄的來源
pub trait CatalogProvider {
    fn services(&self) -> &[Service];
    fn templates(&self) -> &[PackageTemplate];
    fn copy_templates(&self) -> &HashMap<String, CopyTemplate>;
}
