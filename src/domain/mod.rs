// Domain layer: records, summary types and ports. No I/O here.

pub mod model;
pub mod ports;
