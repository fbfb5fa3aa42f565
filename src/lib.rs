pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod rate_limit;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
