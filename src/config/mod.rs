//! Cluster Configuration Module
//!
//! Provides the classifier configuration loaded from TOML files: input
//! columns, spacing and volume ranges, engine policy and export options.
//!
//! ## Loading Order
//!
//! 1. `WELL_CLUSTER_CONFIG` environment variable (path to TOML file)
//! 2. `cluster_config.toml` in the current working directory
//! 3. Built-in defaults (5 spacing ranges in acres, 3 volume ranges in MSTB)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(ClusterConfig::load());
//!
//! // Anywhere in the codebase:
//! let unit = &config::get().spacing.unit;
//! ```

mod cluster_config;
pub mod defaults;
pub mod validation;

pub use cluster_config::*;

use std::sync::OnceLock;

/// Global cluster configuration, initialized once at startup.
static CLUSTER_CONFIG: OnceLock<ClusterConfig> = OnceLock::new();

/// Initialize the global cluster configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: ClusterConfig) {
    if CLUSTER_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global cluster configuration.
///
/// Panics if `init()` has not been called; a missing config is a startup bug.
pub fn get() -> &'static ClusterConfig {
    CLUSTER_CONFIG
        .get()
        .expect("config::get() called before config::init(), this is a startup bug")
}
