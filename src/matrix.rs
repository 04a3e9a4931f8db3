//! Dense matrix storage and the element types it can hold

use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value type a matrix can be loaded into
///
/// `parse_token` holds the numeric conversion rules for non-categorical
/// tokens; `from_mapped` turns a mapper-assigned value (a categorical code or
/// NaN) into the element type, refusing values the type cannot represent.
pub trait Element: Copy + Default + PartialEq + fmt::Debug {
    /// Parse a numeric token
    fn parse_token(token: &str) -> Option<Self>;

    /// Convert a mapped value, `None` if it is not representable
    fn from_mapped(value: f64) -> Option<Self>;

    /// Lossy conversion back to `f64`
    fn to_f64(self) -> f64;
}

macro_rules! impl_float_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            fn parse_token(token: &str) -> Option<Self> {
                token.parse::<$t>().ok()
            }

            fn from_mapped(value: f64) -> Option<Self> {
                Some(value as $t)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

macro_rules! impl_int_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            fn parse_token(token: &str) -> Option<Self> {
                token.parse::<$t>().ok()
            }

            fn from_mapped(value: f64) -> Option<Self> {
                if value.fract() != 0.0 || value < <$t>::MIN as f64 || value > <$t>::MAX as f64 {
                    return None;
                }
                Some(value as $t)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_float_element!(f32, f64);
impl_int_element!(i32, i64, u8, u16, u32, u64, usize);

/// Dense column-major matrix
///
/// Element `(row, col)` lives at `col * n_rows + row`. The shape is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T> {
    n_rows: usize,
    n_cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Matrix of the given shape filled with `T::default()`
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Matrix {
            n_rows,
            n_cols,
            data: vec![T::default(); n_rows * n_cols],
        }
    }

    /// Build a matrix from row slices
    ///
    /// Returns `None` when the rows have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvmat::Matrix;
    ///
    /// let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    pub fn from_rows(rows: &[Vec<T>]) -> Option<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return None;
        }
        let mut m = Self::zeros(n_rows, n_cols);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m[(r, c)] = *value;
            }
        }
        Some(m)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Whether the matrix holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(row, col)`, `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.data[col * self.n_rows + row])
        } else {
            None
        }
    }

    /// Copy of one row
    pub fn row(&self, row: usize) -> Vec<T> {
        (0..self.n_cols).map(|c| self[(row, c)]).collect()
    }

    /// One column as a slice
    pub fn col(&self, col: usize) -> &[T] {
        let start = col * self.n_rows;
        &self.data[start..start + self.n_rows]
    }

    /// All rows, top to bottom
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.n_rows).map(|r| self.row(r)).collect()
    }

    /// Transposed copy
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.n_cols, self.n_rows);
        for c in 0..self.n_cols {
            for r in 0..self.n_rows {
                out[(c, r)] = self[(r, c)];
            }
        }
        out
    }

    /// Backing storage in column-major order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        &self.data[col * self.n_rows + row]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        &mut self.data[col * self.n_rows + row]
    }
}

impl<T: Element + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.n_rows {
            for c in 0..self.n_cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self[(r, c)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
