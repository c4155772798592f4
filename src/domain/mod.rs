// Domain layer: configuration records and ports (interfaces) to external systems.

pub mod model;
pub mod ports;
