//! JSON-RPC telemetry and control API for a GPU mining farm.
//!
//! The crate exposes a farm's share counters, hash rates, device telemetry
//! and pool addresses to monitoring dashboards, plus a restart command for
//! management consoles. The farm itself lives elsewhere and is reached
//! through the [`farm::Farm`] trait.

pub mod api;
pub mod api_client;
pub mod build_info;
pub mod config;
pub mod error;
pub mod farm;
pub mod rpc;
pub mod tracing;
