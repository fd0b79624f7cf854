//! Gateway middleware

pub mod metrics;
