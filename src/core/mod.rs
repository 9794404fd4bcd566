pub mod catalog;
pub mod copy;
pub mod engine;
pub mod export;
pub mod packager;
pub mod payment;
pub mod pricing;
pub mod proposal;
pub mod scheduler;
pub mod synergy;

pub use crate::domain::model::{Package, Proposal, Service};
pub use crate::domain::ports::{CatalogProvider, Storage};
pub use crate::utils::error::Result;
