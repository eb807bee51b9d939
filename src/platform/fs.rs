// LicUsage - platform/fs.rs
//
// Filesystem access for input documents.

use crate::util::constants;
use crate::util::error::InputError;
use std::path::Path;

/// Read a document and decode it as UTF-8.
///
/// Decoding is strict: invalid UTF-8 is reported rather than replaced, so a
/// binary file picked by mistake never reaches the extractor. Files larger
/// than `MAX_INPUT_FILE_SIZE` are rejected before reading.
pub fn read_document(path: &Path) -> Result<String, InputError> {
    let io_err = |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_INPUT_FILE_SIZE {
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: constants::MAX_INPUT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    let text = String::from_utf8(bytes).map_err(|source| InputError::InvalidEncoding {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = size, "Document read");
    Ok(text)
}
