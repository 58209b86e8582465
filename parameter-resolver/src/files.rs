use std::fs::{self, File};
use std::io::Write;

use crate::error::InputError;

/// Largest input document accepted, in bytes.
pub const MAX_FILE_SIZE_IN_BYTES: u64 = 1024 * 1024 * 1024;

pub fn validate_file_and_size(path: &str) -> Result<(), InputError> {
    let unreadable = |source| InputError::Unreadable {
        path: path.to_string(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let size = file.metadata().map_err(unreadable)?.len();

    if size > MAX_FILE_SIZE_IN_BYTES {
        return Err(InputError::TooLarge {
            path: path.to_string(),
            size,
            limit: MAX_FILE_SIZE_IN_BYTES,
        });
    }
    Ok(())
}

pub fn read_text_from_file(path: &str) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_string(),
        source,
    })
}

/// Creates or truncates `path` and writes `text` into it.
pub fn write_to_file(text: &str, path: &str) -> Result<(), InputError> {
    let unwritable = |source| InputError::Unwritable {
        path: path.to_string(),
        source,
    };

    let mut file = File::create(path).map_err(unwritable)?;
    file.write_all(text.as_bytes()).map_err(unwritable)?;
    file.flush().map_err(unwritable)
}
