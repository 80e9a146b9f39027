// Domain layer: records and ports. Transport and backend details live in adapters/http.

pub mod model;
pub mod ports;
