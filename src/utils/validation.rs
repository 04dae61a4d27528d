//! Input validation utilities
//!
//! Provides input validation for raw identifiers.

/// Longest local path the resolver deals in, in bytes (Linux `PATH_MAX`)
pub const MAX_PATH_LENGTH: usize = 4096;

/// Longest identifier the parser accepts, in bytes.
///
/// Room for a `PATH_MAX` path with every byte percent-encoded.
pub const MAX_IDENTIFIER_LENGTH: usize = 3 * MAX_PATH_LENGTH;

/// Validate that input is not blank, not oversized, and free of NUL/CR/LF
pub fn is_valid_identifier(input: &str) -> bool {
    !input.trim().is_empty()
        && input.len() <= MAX_IDENTIFIER_LENGTH
        && !input.contains(['\0', '\r', '\n'])
}
