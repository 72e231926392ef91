use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::errors::LoadError;
use crate::models::StatsDocument;

///
/// Load a JSON document from disk.
///
/// # Arguments
/// - location: path to the golden or regenerated document
///
/// # Returns
/// - an immutable [StatsDocument], or a [LoadError] when the file is missing,
///   empty, truncated or otherwise not parseable.
///
pub fn load<P: AsRef<Path>>(location: P) -> Result<StatsDocument, LoadError> {
    let location = location.as_ref();

    let text = match read_to_string(location) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LoadError::Missing(location.to_path_buf()));
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: location.to_path_buf(),
                source,
            });
        }
    };

    let document = StatsDocument::parse(location, &text)?;
    debug!("Loaded {} ({} bytes)", location.display(), text.len());

    Ok(document)
}
