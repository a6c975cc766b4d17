//! Compiler configuration
//!
//! Split into compile-time constants (language invariants, hard limits) and
//! runtime preferences (user-facing behavior toggles).

pub mod constants;
pub mod preferences;

pub use preferences::CompilerPreferences;
