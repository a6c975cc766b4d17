//! Compile-time constants for the DrakonScript compiler

/// Reserved speechbank name used for shared rule fragments.
/// A `preset { ... }` block compiles under this name; ordinary groups must
/// not use it as their own name or reference it as a parent.
pub const RESERVED_PRESET_NAME: &str = "preset";

/// Maximum identifier length accepted by the statement lexer.
/// Prevents parser complexity attacks via enormous identifiers.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;
