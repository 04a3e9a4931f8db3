//! Per-dimension mapper with pluggable policy

use super::{Datatype, IncrementPolicy, MapPolicy, Mapper};
use crate::error::{LoadError, Result};
use crate::matrix::Element;
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Token → value mappings of one dimension, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionMap {
    entries: IndexMap<String, f64>,
}

impl DimensionMap {
    /// Value assigned to a token
    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries.get(token).copied()
    }

    /// Assign a value to a token
    pub fn insert(&mut self, token: &str, value: f64) {
        self.entries.insert(token.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens mapped to `value`, in first-seen order (NaN matches NaN)
    pub fn tokens_for(&self, value: f64) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(move |(_, v)| **v == value || (v.is_nan() && value.is_nan()))
            .map(|(k, _)| k.as_str())
    }
}

/// Tracks the datatype and token mappings of every dimension of a dataset
///
/// Reusing a mapper across loads keeps the category codes consistent: load
/// the training file first, then load the test file with the same mapper and
/// its dimensionality is checked against the training data.
///
/// # Examples
///
/// ```no_run
/// use csvmat::{CsvLoader, DatasetMapper, Datatype, Matrix};
///
/// let mut info = DatasetMapper::new(0);
/// let mut loader = CsvLoader::open("iris.csv")?;
/// let data: Matrix<f64> = loader.load(&mut info, true)?;
/// if info.datatype(4) == Datatype::Categorical {
///     println!("label 0 is {:?}", info.unmap_string(0.0, 4, 0));
/// }
/// # Ok::<(), csvmat::LoadError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatasetMapper<P = IncrementPolicy> {
    types: Vec<Datatype>,
    maps: Vec<DimensionMap>,
    policy: P,
}

impl DatasetMapper<IncrementPolicy> {
    /// Mapper with the default [`IncrementPolicy`]
    pub fn new(dimensionality: usize) -> Self {
        Self::with_policy(IncrementPolicy::default(), dimensionality)
    }
}

impl<P: MapPolicy> DatasetMapper<P> {
    /// Mapper with an explicit policy
    pub fn with_policy(policy: P, dimensionality: usize) -> Self {
        let mut mapper = DatasetMapper {
            types: Vec::new(),
            maps: Vec::new(),
            policy,
        };
        mapper.set_dimensionality(dimensionality);
        mapper
    }

    /// Number of tracked dimensions, `0` when unset
    pub fn dimensionality(&self) -> usize {
        self.types.len()
    }

    /// Track `dimensionality` numeric dimensions, forgetting all mappings
    pub fn set_dimensionality(&mut self, dimensionality: usize) {
        self.types = vec![Datatype::Numeric; dimensionality];
        self.maps = vec![DimensionMap::default(); dimensionality];
    }

    /// Datatype of a dimension (`Numeric` when out of range)
    pub fn datatype(&self, dimension: usize) -> Datatype {
        self.types.get(dimension).copied().unwrap_or_default()
    }

    /// Override the datatype of a dimension before loading
    pub fn set_datatype(&mut self, dimension: usize, datatype: Datatype) {
        if let Some(slot) = self.types.get_mut(dimension) {
            *slot = datatype;
        }
    }

    /// Number of distinct tokens mapped in a dimension
    pub fn num_mappings(&self, dimension: usize) -> usize {
        self.maps.get(dimension).map_or(0, DimensionMap::len)
    }

    /// The `index`-th token that was mapped to `value` in a dimension
    pub fn unmap_string(&self, value: f64, dimension: usize, index: usize) -> Option<&str> {
        self.maps.get(dimension)?.tokens_for(value).nth(index)
    }

    /// How many tokens were mapped to `value` in a dimension
    pub fn num_unmappings(&self, value: f64, dimension: usize) -> usize {
        self.maps
            .get(dimension)
            .map_or(0, |m| m.tokens_for(value).count())
    }

    /// Value a token was mapped to in a dimension
    pub fn unmap_value(&self, token: &str, dimension: usize) -> Option<f64> {
        self.maps.get(dimension)?.get(token)
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    fn check_dimension(&self, token: &str, dimension: usize) -> Result<()> {
        if dimension < self.types.len() {
            Ok(())
        } else {
            Err(LoadError::conversion(
                token,
                dimension,
                format!("mapper only has {} dimensions", self.types.len()),
            ))
        }
    }
}

impl<T: Element, P: MapPolicy> Mapper<T> for DatasetMapper<P> {
    fn dimensionality(&self) -> usize {
        DatasetMapper::dimensionality(self)
    }

    fn set_dimensionality(&mut self, dimensionality: usize) {
        DatasetMapper::set_dimensionality(self, dimensionality)
    }

    fn needs_first_pass(&self) -> bool {
        self.policy.needs_first_pass()
    }

    fn map_first_pass(&mut self, token: &str, dimension: usize) {
        if let Some(datatype) = self.types.get_mut(dimension) {
            self.policy.map_first_pass::<T>(token, datatype);
        }
    }

    fn map_string(&mut self, token: &str, dimension: usize) -> Result<T> {
        self.check_dimension(token, dimension)?;
        self.policy.map_string::<T>(
            token,
            dimension,
            &mut self.maps[dimension],
            &mut self.types[dimension],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MissingPolicy;

    #[test]
    fn test_set_dimensionality_resets() {
        let mut info = DatasetMapper::new(2);
        Mapper::<f64>::map_first_pass(&mut info, "x", 1);
        let _: f64 = info.map_string("x", 1).unwrap();
        assert_eq!(info.datatype(1), Datatype::Categorical);
        assert_eq!(info.num_mappings(1), 1);

        info.set_dimensionality(3);
        assert_eq!(info.dimensionality(), 3);
        assert_eq!(info.datatype(1), Datatype::Numeric);
        assert_eq!(info.num_mappings(1), 0);
    }

    #[test]
    fn test_unmap_roundtrip() {
        let mut info = DatasetMapper::new(1);
        info.set_datatype(0, Datatype::Categorical);
        for token in ["cat", "dog", "cat"] {
            let _: f64 = info.map_string(token, 0).unwrap();
        }
        assert_eq!(info.unmap_string(1.0, 0, 0), Some("dog"));
        assert_eq!(info.unmap_value("cat", 0), Some(0.0));
        assert_eq!(info.unmap_string(5.0, 0, 0), None);
    }

    #[test]
    fn test_missing_unmap_nan() {
        let mut info = DatasetMapper::with_policy(MissingPolicy::new(["?"]), 1);
        let _: f64 = info.map_string("?", 0).unwrap();
        let _: f64 = info.map_string("n/a", 0).unwrap();
        assert_eq!(info.num_unmappings(f64::NAN, 0), 2);
        assert_eq!(info.unmap_string(f64::NAN, 0, 1), Some("n/a"));
        assert!(!Mapper::<f64>::needs_first_pass(&info));
    }

    #[test]
    fn test_out_of_range_dimension() {
        let mut info = DatasetMapper::new(1);
        let err = Mapper::<f64>::map_string(&mut info, "1", 4).unwrap_err();
        assert!(matches!(err, LoadError::Conversion { dimension: 4, .. }));
        // first pass silently ignores it
        Mapper::<f64>::map_first_pass(&mut info, "1", 4);
    }
}
