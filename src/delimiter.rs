//! File extension to delimiter lookup

use crate::error::{LoadError, Result};
use std::path::Path;

/// Registered extensions and the delimiter each one implies
///
/// `txt` splits on a single space; runs of spaces are not collapsed unless
/// [`LoadOptions::collapse_whitespace`](crate::LoadOptions::collapse_whitespace) is set.
pub const DELIMITERS: &[(&str, char)] = &[("csv", ','), ("tsv", '\t'), ("txt", ' ')];

/// Container suffixes that are looked through when detecting the file type
pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "zst"];

/// Resolve the delimiter for a lower-cased extension
///
/// # Examples
///
/// ```
/// use csvmat::delimiter::resolve_delimiter;
///
/// assert_eq!(resolve_delimiter("tsv").unwrap(), '\t');
/// assert!(resolve_delimiter("xlsx").is_err());
/// ```
pub fn resolve_delimiter(extension: &str) -> Result<char> {
    DELIMITERS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, delim)| *delim)
        .ok_or_else(|| LoadError::UnsupportedExtension(extension.to_string()))
}

/// Lower-cased data extension of a path
///
/// `data.CSV` → `csv`, `data.tsv.zst` → `tsv`. Returns an empty string when
/// the path has no extension.
pub fn extension_of(path: &Path) -> String {
    let ext = lower_extension(path);
    if is_archive_extension(&ext) {
        if let Some(stem) = path.file_stem() {
            return lower_extension(Path::new(stem));
        }
    }
    ext
}

/// Whether the path is a `.zip`/`.zst` container
pub fn is_archive(path: &Path) -> bool {
    is_archive_extension(&lower_extension(path))
}

fn is_archive_extension(ext: &str) -> bool {
    ARCHIVE_EXTENSIONS.contains(&ext)
}

fn lower_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
