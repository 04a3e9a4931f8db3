//! Two-pass loading of delimited files into matrices

use crate::csv::Tokenizer;
use crate::delimiter::{extension_of, resolve_delimiter};
use crate::error::{LoadError, Result};
use crate::mapper::{DatasetMapper, Mapper};
use crate::matrix::{Element, Matrix};
use crate::populate::{populate_column_major, populate_row_major};
use crate::scan::{scan_column_major, scan_row_major};
use crate::source::{open_path, LineSource};
use std::path::Path;

/// Where a [`CsvLoader`] is in its current load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No source is attached
    Unopened,
    /// A source is attached and ready
    Opened,
    /// Dimensions are known and the matrix is allocated
    Scanned,
    /// Every value has been written
    Populated,
    /// The last load returned a matrix
    Done,
    /// The last load returned an error
    Failed,
}

/// Loader configuration (builder pattern)
///
/// # Examples
///
/// ```
/// use csvmat::LoadOptions;
///
/// let options = LoadOptions::new()
///     .delimiter(';')
///     .collapse_whitespace(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    delimiter: Option<char>,
    collapse_whitespace: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this delimiter instead of the one implied by the file extension
    pub fn delimiter(mut self, delim: char) -> Self {
        self.delimiter = Some(delim);
        self
    }

    /// Treat runs of a whitespace delimiter as one separator
    ///
    /// Off by default: `1  2` in a `.txt` file is three tokens, the middle one
    /// empty.
    pub fn collapse_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }
}

/// Loads one delimited source into dense matrices
///
/// The source is read twice per load: once to find the shape (and let the
/// mapper look at every token if it asks to), once to convert and store the
/// values. The loader owns its source and closes it when dropped.
///
/// # Examples
///
/// ```no_run
/// use csvmat::{CsvLoader, DatasetMapper, Matrix};
///
/// let mut info = DatasetMapper::new(0);
/// let mut loader = CsvLoader::open("data.csv")?;
///
/// // each line becomes a column
/// let data: Matrix<f64> = loader.load(&mut info, true)?;
/// println!("{} dimensions, {} points", data.n_rows(), data.n_cols());
/// # Ok::<(), csvmat::LoadError>(())
/// ```
pub struct CsvLoader<S = Box<dyn LineSource>> {
    source: Option<S>,
    tokenizer: Tokenizer,
    state: LoadState,
}

impl CsvLoader {
    /// Open a `.csv`, `.tsv` or `.txt` file (optionally inside a `.zip`/`.zst` archive)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, LoadOptions::default())
    }

    /// Open a file with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let delimiter = match options.delimiter {
            Some(delim) => delim,
            None => resolve_delimiter(&extension_of(path))?,
        };
        let source = open_path(path)?;
        tracing::debug!(path = %path.display(), ?delimiter, "opened delimited source");

        let tokenizer = Tokenizer::new(delimiter).collapse_whitespace(options.collapse_whitespace);
        Ok(CsvLoader {
            source: Some(source),
            tokenizer,
            state: LoadState::Opened,
        })
    }
}

impl<S: LineSource> CsvLoader<S> {
    /// Load from any rewindable source with a known delimiter
    pub fn from_source(source: S, delimiter: char) -> Self {
        Self::from_source_with(source, LoadOptions::new().delimiter(delimiter))
    }

    /// Load from any rewindable source
    ///
    /// A source has no extension to resolve a delimiter from, so without one
    /// in `options` it is read as comma separated.
    pub fn from_source_with(source: S, options: LoadOptions) -> Self {
        let tokenizer = Tokenizer::new(options.delimiter.unwrap_or(','))
            .collapse_whitespace(options.collapse_whitespace);
        CsvLoader {
            source: Some(source),
            tokenizer,
            state: LoadState::Opened,
        }
    }

    /// Delimiter used for splitting lines
    pub fn delimiter(&self) -> char {
        self.tokenizer.delimiter()
    }

    /// State after the most recent step
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Release the source now instead of on drop
    pub fn close(&mut self) {
        self.source = None;
        self.state = LoadState::Unopened;
    }

    /// Load the whole source into a new matrix
    ///
    /// With `transpose` each line becomes a column (the usual layout for
    /// datasets, one point per column); without it each line becomes a row.
    /// The mapper's dimensionality is the row count of the result; if it was
    /// already set it must match.
    pub fn load<T, M>(&mut self, mapper: &mut M, transpose: bool) -> Result<Matrix<T>>
    where
        T: Element,
        M: Mapper<T> + ?Sized,
    {
        match self.run(mapper, transpose) {
            Ok(matrix) => {
                self.state = LoadState::Done;
                tracing::debug!(
                    rows = matrix.n_rows(),
                    cols = matrix.n_cols(),
                    transpose,
                    "loaded matrix"
                );
                Ok(matrix)
            }
            Err(e) => {
                if self.source.is_some() {
                    self.state = LoadState::Failed;
                }
                tracing::debug!(error = %e, "load failed");
                Err(e)
            }
        }
    }

    fn run<T, M>(&mut self, mapper: &mut M, transpose: bool) -> Result<Matrix<T>>
    where
        T: Element,
        M: Mapper<T> + ?Sized,
    {
        let source = self.source.as_mut().ok_or(LoadError::NotOpen)?;
        let tokenizer = &self.tokenizer;
        self.state = LoadState::Opened;

        let dims = if transpose {
            scan_column_major::<T, _, _>(source, tokenizer, mapper)?
        } else {
            scan_row_major::<T, _, _>(source, tokenizer, mapper)?
        };

        let mut matrix = Matrix::zeros(dims.rows, dims.cols);
        self.state = LoadState::Scanned;

        if transpose {
            populate_column_major(source, tokenizer, mapper, &mut matrix)?;
        } else {
            populate_row_major(source, tokenizer, mapper, &mut matrix)?;
        }
        self.state = LoadState::Populated;

        Ok(matrix)
    }
}

/// Open `path` and load it with `mapper`
pub fn load_csv<T, M, P>(path: P, mapper: &mut M, transpose: bool) -> Result<Matrix<T>>
where
    T: Element,
    M: Mapper<T> + ?Sized,
    P: AsRef<Path>,
{
    CsvLoader::open(path)?.load(mapper, transpose)
}

/// Open `path` and load it with a fresh default [`DatasetMapper`]
///
/// Non-numeric dimensions are encoded as categories; the returned mapper
/// translates the codes back.
pub fn load_numeric<T, P>(path: P, transpose: bool) -> Result<(Matrix<T>, DatasetMapper)>
where
    T: Element,
    P: AsRef<Path>,
{
    let mut info = DatasetMapper::new(0);
    let matrix = load_csv(path, &mut info, transpose)?;
    Ok((matrix, info))
}
