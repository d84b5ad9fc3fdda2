//! Library crate for fastbreak-picks, exposing modules for binaries and
//! integration tests.

/// Injectable time source.
pub mod clock;
/// Runtime configuration loading.
pub mod config;
/// Storage entities and backends.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Game-day resolution rules.
pub mod gameday;
/// Sports-data provider clients.
pub mod provider;
/// HTTP route trees.
pub mod routes;
/// Business logic.
pub mod services;
/// Shared application state.
pub mod state;
