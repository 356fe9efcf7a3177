pub mod metrics;
pub mod v1;
