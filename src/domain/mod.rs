// Domain layer: tasting models, the known samples catalog and ports.

pub mod catalog;
pub mod model;
pub mod ports;
