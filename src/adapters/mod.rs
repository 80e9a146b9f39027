// Adapters layer: concrete backends behind the domain ports.

pub mod local_storage;
pub mod memory_store;
pub mod rest_store;
