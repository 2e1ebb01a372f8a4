//! Per-driver monthly ledger for a transport business.
//!
//! The `db` module is the core: typed entries keyed by (driver, month),
//! per-month aggregation across drivers, and a pluggable storage backend.
//! `api` and `cli` are thin surfaces over it.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod import;
pub mod telemetry;
