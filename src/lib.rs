//! # csvmat
//!
//! Load comma, tab or space separated text files into dense typed matrices.
//!
//! Loading takes two passes over the file. The first pass finds the shape
//! (and lets the [`Mapper`] see every token, so it can decide which
//! dimensions are categorical); the matrix is then allocated once and the
//! second pass converts and stores every value. Double-quoted fields may
//! contain the delimiter.
//!
//! ## Quick start
//!
//! ```no_run
//! use csvmat::{load_numeric, Matrix};
//!
//! // one column per line of the file
//! let (data, info): (Matrix<f64>, _) = load_numeric("iris.csv", true)?;
//! println!("{}x{}, {} labels", data.n_rows(), data.n_cols(), info.num_mappings(4));
//! # Ok::<(), csvmat::LoadError>(())
//! ```
//!
//! ## File types
//!
//! | Extension | Delimiter |
//! |-----------|-----------|
//! | `.csv`    | `,`       |
//! | `.tsv`    | tab       |
//! | `.txt`    | space     |
//!
//! Any of these may be wrapped in a `.zip` or `.zst` archive.

pub mod csv;
pub mod delimiter;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod matrix;
pub mod populate;
pub mod scan;
pub mod source;

pub use error::{LoadError, Result};
pub use loader::{load_csv, load_numeric, CsvLoader, LoadOptions, LoadState};
pub use mapper::{Datatype, DatasetMapper, IncrementPolicy, MapPolicy, Mapper, MissingPolicy};
pub use matrix::{Element, Matrix};
pub use source::{FileSource, LineSource, MemorySource, ReaderSource};
