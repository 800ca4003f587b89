//! Page text sources.

use std::path::Path;

use crate::error::DocumentError;

/// Something that can turn a contract file into per-page text.
///
/// Pages come back in document order. A page whose text could not be
/// extracted is `None`; the document as a whole only fails when it cannot be
/// opened at all.
pub trait PageSource {
    fn read_pages(&self, path: &Path) -> Result<Vec<Option<String>>, DocumentError>;
}
