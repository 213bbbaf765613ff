//! Core library for the tenant tool-server fleet.
//!
//! `main.rs` is a thin binary wrapper around [`supervisor::run`]; everything
//! else lives here so it can be exercised directly from tests.

pub mod availability;
pub mod crm;
pub mod http_client;
pub mod observability;
pub mod pg_pool;
pub mod result;
pub mod retrievers;
pub mod retry;
pub mod runtime_env;
pub mod server;
pub mod settings;
pub mod supervisor;
pub mod tenants;
pub mod timezone;
pub mod tools;
