pub mod error;
pub mod ids;
pub mod logger;
pub mod money;
pub mod validation;
