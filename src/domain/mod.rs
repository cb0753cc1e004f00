// Domain layer: models and the ports the core drives. Adapters implement the ports.

pub mod model;
pub mod ports;
