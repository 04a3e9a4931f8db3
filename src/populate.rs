//! Second pass: convert tokens and fill a pre-sized matrix

use crate::csv::Tokenizer;
use crate::error::{LoadError, Result};
use crate::mapper::Mapper;
use crate::matrix::{Element, Matrix};
use crate::source::LineSource;

/// Fill `matrix` with one line per row
///
/// Token `c` of line `r` is mapped under dimension `r` and stored at `(r, c)`.
/// A line is checked for its token count before anything from it is stored.
pub fn populate_row_major<T, S, M>(
    source: &mut S,
    tokenizer: &Tokenizer,
    mapper: &mut M,
    matrix: &mut Matrix<T>,
) -> Result<()>
where
    T: Element,
    S: LineSource + ?Sized,
    M: Mapper<T> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    source.rewind()?;
    let mut line = String::new();
    let mut row = 0;

    while source.next_line(&mut line)? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if row >= rows {
            return Err(LoadError::LineCount {
                found: row + 1,
                expected: rows,
            });
        }

        let tokens = tokenizer.parse_line(trimmed, row + 1)?;
        if tokens.len() != cols {
            return Err(LoadError::TokenCount {
                line: row + 1,
                found: tokens.len(),
                expected: cols,
            });
        }
        for (col, token) in tokens.iter().enumerate() {
            matrix[(row, col)] = mapper.map_string(token, row)?;
        }
        row += 1;
    }

    finish(source, row, rows)
}

/// Fill `matrix` with one line per column
///
/// Token `r` of line `c` is mapped under dimension `r` and stored at `(r, c)`.
pub fn populate_column_major<T, S, M>(
    source: &mut S,
    tokenizer: &Tokenizer,
    mapper: &mut M,
    matrix: &mut Matrix<T>,
) -> Result<()>
where
    T: Element,
    S: LineSource + ?Sized,
    M: Mapper<T> + ?Sized,
{
    let (rows, cols) = matrix.shape();
    source.rewind()?;
    let mut line = String::new();
    let mut col = 0;

    while source.next_line(&mut line)? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if col >= cols {
            return Err(LoadError::LineCount {
                found: col + 1,
                expected: cols,
            });
        }

        let tokens = tokenizer.parse_line(trimmed, col + 1)?;
        if tokens.len() != rows {
            return Err(LoadError::TokenCount {
                line: col + 1,
                found: tokens.len(),
                expected: rows,
            });
        }
        for (row, token) in tokens.iter().enumerate() {
            matrix[(row, col)] = mapper.map_string(token, row)?;
        }
        col += 1;
    }

    finish(source, col, cols)
}

fn finish<S: LineSource + ?Sized>(source: &mut S, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(LoadError::LineCount { found, expected });
    }
    source.rewind()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    /// Parses numbers and counts how often each dimension was asked for
    #[derive(Default)]
    struct Counting {
        calls: Vec<usize>,
    }

    impl Mapper<f64> for Counting {
        fn dimensionality(&self) -> usize {
            0
        }
        fn set_dimensionality(&mut self, _dimensionality: usize) {}
        fn needs_first_pass(&self) -> bool {
            false
        }
        fn map_first_pass(&mut self, _token: &str, _dimension: usize) {}
        fn map_string(&mut self, token: &str, dimension: usize) -> Result<f64> {
            self.calls.push(dimension);
            token
                .parse()
                .map_err(|_| LoadError::conversion(token, dimension, "not a number"))
        }
    }

    #[test]
    fn test_row_major() {
        let mut source = MemorySource::from_bytes("1,2,3\n4,5,6\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 3);
        let mut mapper = Counting::default();
        populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix).unwrap();
        assert_eq!(
            matrix.to_rows(),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
        );
        assert_eq!(mapper.calls, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_column_major() {
        let mut source = MemorySource::from_bytes("1,2,3\n4,5,6\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(3, 2);
        let mut mapper = Counting::default();
        populate_column_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap();
        assert_eq!(
            matrix.to_rows(),
            vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]
        );
        assert_eq!(mapper.calls, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_wrong_token_count_row_major() {
        let mut source = MemorySource::from_bytes("1,2,3\n4,5\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 3);
        let mut mapper = Counting::default();
        let err = populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::TokenCount {
                line: 2,
                found: 2,
                expected: 3
            }
        ));
        // nothing from the bad line was converted
        assert_eq!(mapper.calls.len(), 3);
    }

    #[test]
    fn test_wrong_token_count_column_major() {
        let mut source = MemorySource::from_bytes("1,2\n3,4,5\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 2);
        let mut mapper = Counting::default();
        let err =
            populate_column_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
                .unwrap_err();
        assert!(matches!(
            err,
            LoadError::TokenCount {
                line: 2,
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_conversion_error_is_passed_through() {
        let mut source = MemorySource::from_bytes("1,x\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(1, 2);
        let mut mapper = Counting::default();
        let err = populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap_err();
        match err {
            LoadError::Conversion { token, dimension, .. } => {
                assert_eq!(token, "x");
                assert_eq!(dimension, 0);
            }
            other => panic!("expected Conversion, got {:?}", other),
        }
    }

    #[test]
    fn test_more_lines_than_scanned() {
        let mut source = MemorySource::from_bytes("1\n2\n3\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 1);
        let mut mapper = Counting::default();
        let err = populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::LineCount {
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_fewer_lines_than_scanned() {
        let mut source = MemorySource::from_bytes("1\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 1);
        let mut mapper = Counting::default();
        let err = populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::LineCount {
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_blank_line_stops_population() {
        let mut source = MemorySource::from_bytes("1,2\n\n9,9,9\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(1, 2);
        let mut mapper = Counting::default();
        populate_row_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix).unwrap();
        assert_eq!(matrix.row(0), vec![1.0, 2.0]);
    }

    #[test]
    fn test_blank_line_stops_column_major_population() {
        let mut source = MemorySource::from_bytes("1,2\n3,4\n\n9,9,9\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 2);
        let mut mapper = Counting::default();
        populate_column_major(&mut source, &Tokenizer::new(','), &mut mapper, &mut matrix)
            .unwrap();
        assert_eq!(matrix.to_rows(), vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_line_count_column_major() {
        let tokenizer = Tokenizer::new(',');
        let mut mapper = Counting::default();

        let mut source = MemorySource::from_bytes("1,2\n3,4\n5,6\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 2);
        let err = populate_column_major(&mut source, &tokenizer, &mut mapper, &mut matrix)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::LineCount {
                found: 3,
                expected: 2
            }
        ));

        let mut source = MemorySource::from_bytes("1,2\n");
        let mut matrix: Matrix<f64> = Matrix::zeros(2, 2);
        let err = populate_column_major(&mut source, &tokenizer, &mut mapper, &mut matrix)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::LineCount {
                found: 1,
                expected: 2
            }
        ));
    }
}
