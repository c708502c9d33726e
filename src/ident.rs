//! Random URL-safe identifiers for naming uploaded and downloaded artifacts

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length used for uploaded object names.
pub const OBJECT_NAME_LENGTH: usize = 21;

/// Length used for download filename suffixes.
pub const FILENAME_SUFFIX_LENGTH: usize = 8;

/// Generate a random identifier of `length` characters drawn uniformly
/// from the 62-character alphanumeric alphabet (A-Z, a-z, 0-9).
pub fn generate(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
