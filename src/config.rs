//! Configuration for AtlasCol
//!
//! Centralized configuration with sensible defaults.

/// Environment variable that switches on the column store dump
pub const DEBUG_ENV_VAR: &str = "ATLASCOL_DEBUG";

/// Main configuration for an AtlasCol engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Visibility Configuration
    // -------------------------------------------------------------------------
    /// Multi-version mode: sessions see their own uncommitted changes but
    /// not those of other sessions. Applies to every table of the engine.
    pub multi_version: bool,

    // -------------------------------------------------------------------------
    // Diagnostics Configuration
    // -------------------------------------------------------------------------
    /// Dump the whole column store (at trace level) after every add
    pub debug_dump: bool,

    // -------------------------------------------------------------------------
    // Planner Configuration
    // -------------------------------------------------------------------------
    /// Constant added to the scan index cost so a full scan never looks free
    pub cost_row_offset: f64,
}

impl Default for Config {
    fn default() -> Self {
        let debug_dump = std::env::var(DEBUG_ENV_VAR)
            .map(|v| v.eq_ignore_ascii_case("on"))
            .unwrap_or(false);

        Self {
            multi_version: false,
            debug_dump,
            cost_row_offset: 1000.0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Enable or disable multi-version visibility
    pub fn multi_version(mut self, enabled: bool) -> Self {
        self.config.multi_version = enabled;
        self
    }

    /// Enable or disable the column store dump
    pub fn debug_dump(mut self, enabled: bool) -> Self {
        self.config.debug_dump = enabled;
        self
    }

    /// Set the constant added to full scan costs
    pub fn cost_row_offset(mut self, offset: f64) -> Self {
        self.config.cost_row_offset = offset;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
