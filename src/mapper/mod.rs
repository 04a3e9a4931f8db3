//! Token-to-value mapping
//!
//! The loader never interprets token text itself. Every token goes through a
//! [`Mapper`], which decides whether it is a number or a category and keeps
//! per-dimension state across both passes. [`DatasetMapper`] is the stock
//! implementation; its behaviour is chosen by a [`MapPolicy`].

mod dataset_mapper;
mod policies;

pub use dataset_mapper::{DatasetMapper, DimensionMap};
pub use policies::{IncrementPolicy, MapPolicy, MissingPolicy};

use crate::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a dimension holds numbers or encoded categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Datatype {
    #[default]
    Numeric,
    Categorical,
}

/// Collaborator that turns tokens into values of type `T`
///
/// A dimension is a matrix row: the line index for row-major loads, the
/// token position for transposed loads.
pub trait Mapper<T> {
    /// Number of dimensions this mapper tracks, `0` when unset
    fn dimensionality(&self) -> usize;

    /// Reset the mapper to track `dimensionality` dimensions
    fn set_dimensionality(&mut self, dimensionality: usize);

    /// Whether every token should be shown to [`Mapper::map_first_pass`] while scanning
    fn needs_first_pass(&self) -> bool;

    /// Observe a token during the scan pass
    fn map_first_pass(&mut self, token: &str, dimension: usize);

    /// Convert a token during the populate pass
    fn map_string(&mut self, token: &str, dimension: usize) -> Result<T>;
}
