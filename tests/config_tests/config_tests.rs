//! Tests for Config
//!
//! These tests verify:
//! - Default values
//! - Builder overrides
//! - The debug switch read from the environment

use std::env;

use atlascol::config::DEBUG_ENV_VAR;
use atlascol::Config;

// =============================================================================
// Default / Builder Tests
// =============================================================================

#[test]
fn test_default_values() {
    let config = Config::default();

    assert!(!config.multi_version);
    assert_eq!(config.cost_row_offset, 1000.0);
}

#[test]
fn test_builder_overrides() {
    let config = Config::builder()
        .multi_version(true)
        .debug_dump(true)
        .cost_row_offset(10.0)
        .build();

    assert!(config.multi_version);
    assert!(config.debug_dump);
    assert_eq!(config.cost_row_offset, 10.0);

    let config = Config::builder().debug_dump(false).build();
    assert!(!config.debug_dump);
    assert!(!config.multi_version);
}

// =============================================================================
// Environment Tests
// =============================================================================

// Kept in one test: the variable is process-wide.
#[test]
fn test_debug_dump_from_environment() {
    env::remove_var(DEBUG_ENV_VAR);
    assert!(!Config::default().debug_dump);

    env::set_var(DEBUG_ENV_VAR, "on");
    assert!(Config::default().debug_dump);

    env::set_var(DEBUG_ENV_VAR, "ON");
    assert!(Config::default().debug_dump);
    assert!(Config::builder().build().debug_dump);

    for other in ["off", "1", "true", ""] {
        env::set_var(DEBUG_ENV_VAR, other);
        assert!(!Config::default().debug_dump, "{:?} should not enable the dump", other);
    }

    env::remove_var(DEBUG_ENV_VAR);
}
