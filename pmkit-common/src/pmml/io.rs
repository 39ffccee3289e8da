//! Reading and writing model documents on disk

use super::document::{Header, ModelDocument};
use crate::{time, xml, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rendering options for [`save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Spaces per nesting level, zero for single-line output
    pub indent: usize,
    /// Whether the header carries a generation timestamp
    pub timestamp: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            timestamp: false,
        }
    }
}

/// Load a model document
///
/// The file handle lives only for the duration of this call.
pub fn load(path: &Path) -> Result<ModelDocument> {
    debug!(path = %path.display(), "Loading document");
    let root = {
        let file = File::open(path)?;
        xml::parse_reader(BufReader::new(file))?
    };
    ModelDocument::from_element(root)
}

/// Save a model document, replacing `path` atomically
///
/// The document is written to `<path>.tmp` and renamed over `path` once
/// complete. On failure the temporary file is removed and `path` is left
/// as it was. The header is regenerated: generator name and version, plus
/// a timestamp when enabled.
pub fn save(document: &ModelDocument, path: &Path, options: &SaveOptions) -> Result<()> {
    let timestamp = options.timestamp.then(|| time::header_timestamp(time::now()));
    let root = document.to_element_with_header(&Header::generated(timestamp));

    let temp_path = temp_path(path);
    let written = write_file(&root, &temp_path, options.indent)
        .and_then(|()| fs::rename(&temp_path, path).map_err(Into::into));

    if let Err(e) = written {
        if temp_path.exists() {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temporary file");
            }
        }
        return Err(e);
    }

    debug!(path = %path.display(), "Saved document");
    Ok(())
}

fn write_file(root: &xml::Element, path: &Path, indent: usize) -> Result<()> {
    let file = File::create(path)?;
    let mut sink = BufWriter::new(file);
    xml::write_document(root, &mut sink, indent)?;
    sink.write_all(b"\n")?;
    let file = sink.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// `<path>.tmp`, next to the destination so the rename stays on one filesystem
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
