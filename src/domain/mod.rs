// Domain layer: models and ports shared by the calculator, config and export code.

pub mod model;
pub mod ports;
