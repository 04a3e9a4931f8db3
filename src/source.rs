//! Rewindable line sources
//!
//! Loading reads its input twice, so a source has to be able to go back to
//! the start. Anything that is `BufRead + Seek` qualifies: files, in-memory
//! buffers and decompressed archive entries.

use crate::delimiter::{extension_of, is_archive, DELIMITERS};
use crate::error::{LoadError, Result};
use s_zip::StreamingZipReader;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::Path;

/// A line-oriented input that can be read from the beginning again
pub trait LineSource {
    /// Move back to the first line
    fn rewind(&mut self) -> Result<()>;

    /// Read the next line into `buf` without its line terminator
    ///
    /// Returns `Ok(false)` at end of input. `buf` is cleared first.
    fn next_line(&mut self, buf: &mut String) -> Result<bool>;
}

/// [`LineSource`] over any buffered, seekable reader
pub struct ReaderSource<R> {
    reader: R,
    lines_read: u64,
}

/// Source backed by a file on disk
pub type FileSource = ReaderSource<BufReader<File>>;

/// Source backed by an owned byte buffer
pub type MemorySource = ReaderSource<Cursor<Vec<u8>>>;

impl<R: BufRead + Seek> ReaderSource<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lines_read: 0,
        }
    }

    /// Lines handed out since the last rewind
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl FileSource {
    /// Open a plain file
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ReaderSource::new(BufReader::new(file)))
    }
}

impl MemorySource {
    /// Source over an owned buffer
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        ReaderSource::new(Cursor::new(data.into()))
    }

    /// Decompress the data entry of a `.zip`/`.zst` container into memory
    ///
    /// The first entry with a registered extension is used; if none has one,
    /// the first entry is.
    pub fn open_archive<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut zip = StreamingZipReader::open(path)
            .map_err(|e| LoadError::Archive(format!("Failed to open ZIP: {}", e)))?;

        let entry_name = zip
            .entries()
            .iter()
            .find(|e| {
                let ext = extension_of(Path::new(&e.name));
                DELIMITERS.iter().any(|(known, _)| *known == ext)
            })
            .or_else(|| zip.entries().first())
            .ok_or_else(|| LoadError::Archive("No data entry found in archive".to_string()))?
            .name
            .clone();

        let data = zip
            .read_entry_by_name(&entry_name)
            .map_err(|e| LoadError::Archive(format!("Failed to read ZIP entry: {}", e)))?;

        tracing::debug!(entry = %entry_name, bytes = data.len(), "decompressed archive entry");
        Ok(Self::from_bytes(data))
    }
}

impl<R: BufRead + Seek> LineSource for ReaderSource<R> {
    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.lines_read = 0;
        Ok(())
    }

    fn next_line(&mut self, buf: &mut String) -> Result<bool> {
        buf.clear();
        let bytes_read = self.reader.read_line(buf)?;
        if bytes_read == 0 {
            return Ok(false);
        }

        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }

        self.lines_read += 1;
        Ok(true)
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }

    fn next_line(&mut self, buf: &mut String) -> Result<bool> {
        (**self).next_line(buf)
    }
}

/// Open a path as a boxed source, decompressing archives into memory
pub fn open_path(path: &Path) -> Result<Box<dyn LineSource>> {
    if is_archive(path) {
        Ok(Box::new(MemorySource::open_archive(path)?))
    } else {
        Ok(Box::new(FileSource::open_file(path)?))
    }
}
