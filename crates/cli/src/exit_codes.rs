//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain      | Description                              |
//! |---------|-------------|------------------------------------------|
//! | 0       | Universal   | Success                                  |
//! | 1       | Universal   | General error (unspecified)              |
//! | 2       | Universal   | CLI usage error (bad args, bad edit op)  |
//! | 3-9     | local       | Parsing, editing, upload preconditions   |
//! | 40-49   | catalog     | Catalog API and credentials              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant mapping function below

use datashelf_client::{ClientError, UploadError};
use datashelf_engine::EditError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, malformed `--edit` operations.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Local (3-9)
// =============================================================================

/// The input file could not be read or decoded.
pub const EXIT_PARSE: u8 = 3;

/// An edit or sheet selection was rejected (out of bounds, bad sheet index).
pub const EXIT_VALIDATION: u8 = 4;

/// Upload attempted with no file loaded.
pub const EXIT_FILE_REQUIRED: u8 = 5;

// =============================================================================
// Catalog (40-49)
// =============================================================================

/// No saved credentials, or the server rejected them.
pub const EXIT_NOT_AUTH: u8 = 40;

/// Server answered with a non-success status, or an unreadable body.
pub const EXIT_HTTP: u8 = 41;

/// Server could not be reached.
pub const EXIT_NETWORK: u8 = 42;

// =============================================================================
// Error mapping
// =============================================================================

pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::NotAuthenticated | ClientError::Unauthorized(_) => EXIT_NOT_AUTH,
        ClientError::Network(_) => EXIT_NETWORK,
        ClientError::Http(..) | ClientError::Parse(_) => EXIT_HTTP,
    }
}

pub fn upload_exit_code(err: &UploadError) -> u8 {
    match err {
        UploadError::FileRequired => EXIT_FILE_REQUIRED,
        UploadError::Serialize(_) => EXIT_ERROR,
        UploadError::Transport(e) => client_exit_code(e),
    }
}

pub fn edit_exit_code(err: &EditError) -> u8 {
    match err {
        EditError::NoFileLoaded => EXIT_FILE_REQUIRED,
        _ => EXIT_VALIDATION,
    }
}
