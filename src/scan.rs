//! First pass: discover the matrix shape
//!
//! Both scans stop at the first blank line, and leave the source rewound.

use crate::csv::Tokenizer;
use crate::error::{LoadError, Result};
use crate::mapper::Mapper;
use crate::source::LineSource;

/// Shape discovered by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

/// Scan a file whose lines are matrix rows
///
/// Rows are the line count and columns the token count of the first line.
/// The mapper's dimensionality is the row count. When the mapper wants a
/// first pass the source is read a second time and every token is shown to
/// it under its line index.
pub fn scan_row_major<T, S, M>(
    source: &mut S,
    tokenizer: &Tokenizer,
    mapper: &mut M,
) -> Result<Dimensions>
where
    S: LineSource + ?Sized,
    M: Mapper<T> + ?Sized,
{
    source.rewind()?;
    let mut dims = Dimensions::default();
    let mut line = String::new();

    while source.next_line(&mut line)? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if dims.rows == 0 {
            dims.cols = tokenizer.parse_line(trimmed, 1)?.len();
        }
        dims.rows += 1;
    }

    check_dimensionality::<T, _>(mapper, dims.rows)?;

    if mapper.needs_first_pass() {
        source.rewind()?;
        let mut row = 0;
        while source.next_line(&mut line)? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            for token in tokenizer.parse_line(trimmed, row + 1)? {
                mapper.map_first_pass(&token, row);
            }
            row += 1;
        }
    }

    source.rewind()?;
    tracing::debug!(rows = dims.rows, cols = dims.cols, "scanned row-major source");
    Ok(dims)
}

/// Scan a file whose lines are matrix columns
///
/// Columns are the line count and rows the token count of the first line.
/// The mapper is checked as soon as the first line is known, and first-pass
/// tokens are shown to it under their position within the line.
pub fn scan_column_major<T, S, M>(
    source: &mut S,
    tokenizer: &Tokenizer,
    mapper: &mut M,
) -> Result<Dimensions>
where
    S: LineSource + ?Sized,
    M: Mapper<T> + ?Sized,
{
    source.rewind()?;
    let needs_first_pass = mapper.needs_first_pass();
    let mut dims = Dimensions::default();
    let mut line = String::new();

    while source.next_line(&mut line)? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        let first = dims.cols == 0;
        if first || needs_first_pass {
            let tokens = tokenizer.parse_line(trimmed, dims.cols + 1)?;
            if first {
                dims.rows = tokens.len();
                check_dimensionality::<T, _>(mapper, dims.rows)?;
            }
            if needs_first_pass {
                for (dimension, token) in tokens.iter().enumerate() {
                    mapper.map_first_pass(token, dimension);
                }
            }
        }
        dims.cols += 1;
    }

    if dims.cols == 0 {
        check_dimensionality::<T, _>(mapper, 0)?;
    }

    source.rewind()?;
    tracing::debug!(rows = dims.rows, cols = dims.cols, "scanned column-major source");
    Ok(dims)
}

/// Adopt `found` if the mapper is unset, otherwise require it to match
fn check_dimensionality<T, M>(mapper: &mut M, found: usize) -> Result<()>
where
    M: Mapper<T> + ?Sized,
{
    let expected = mapper.dimensionality();
    if expected == 0 {
        mapper.set_dimensionality(found);
        Ok(())
    } else if expected != found {
        Err(LoadError::DimensionMismatch { expected, found })
    } else {
        Ok(())
    }
}
