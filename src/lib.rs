pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{CatalogConfig, LocalStorage};
pub use crate::core::{
    catalog::Catalog,
    engine::{PackageRequest, PackagingEngine},
    packager::PackageCalculator,
};
pub use domain::model::{ClientInfo, Customization, Package, PackageSummary, Proposal};
pub use utils::error::{PackagerError, Result};
