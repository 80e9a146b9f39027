pub mod cors;
pub mod endpoints;
pub mod gateway;
pub mod router;

pub use router::{create_router, serve};
