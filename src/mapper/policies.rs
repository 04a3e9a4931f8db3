//! Mapping policies for [`DatasetMapper`](super::DatasetMapper)

use super::{Datatype, DimensionMap};
use crate::error::{LoadError, Result};
use crate::matrix::Element;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a [`DatasetMapper`](super::DatasetMapper) maps tokens of one dimension
pub trait MapPolicy {
    /// Whether the scan pass should feed every token to [`MapPolicy::map_first_pass`]
    fn needs_first_pass(&self) -> bool;

    /// Observe a token while scanning
    fn map_first_pass<T: Element>(&mut self, token: &str, datatype: &mut Datatype);

    /// Produce the value stored for a token
    fn map_string<T: Element>(
        &mut self,
        token: &str,
        dimension: usize,
        map: &mut DimensionMap,
        datatype: &mut Datatype,
    ) -> Result<T>;
}

/// Numeric where possible, otherwise categories numbered `0, 1, 2, …`
///
/// The scan pass marks a dimension categorical as soon as one of its tokens
/// does not parse as the element type, so a whole dimension is encoded the
/// same way. With `include_all` every dimension is categorical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IncrementPolicy {
    include_all: bool,
}

impl IncrementPolicy {
    pub fn new(include_all: bool) -> Self {
        Self { include_all }
    }

    pub fn include_all(&self) -> bool {
        self.include_all
    }
}

impl MapPolicy for IncrementPolicy {
    fn needs_first_pass(&self) -> bool {
        true
    }

    fn map_first_pass<T: Element>(&mut self, token: &str, datatype: &mut Datatype) {
        if *datatype == Datatype::Categorical {
            return;
        }
        if self.include_all || T::parse_token(token).is_none() {
            *datatype = Datatype::Categorical;
        }
    }

    fn map_string<T: Element>(
        &mut self,
        token: &str,
        dimension: usize,
        map: &mut DimensionMap,
        datatype: &mut Datatype,
    ) -> Result<T> {
        if *datatype == Datatype::Numeric && !self.include_all {
            if let Some(value) = T::parse_token(token) {
                return Ok(value);
            }
        }

        // Tokens that reach here are encoded; the dimension becomes categorical.
        *datatype = Datatype::Categorical;
        let code = match map.get(token) {
            Some(code) => code,
            None => {
                let code = map.len() as f64;
                map.insert(token, code);
                code
            }
        };

        T::from_mapped(code).ok_or_else(|| {
            LoadError::conversion(
                token,
                dimension,
                format!("category code {} does not fit the element type", code),
            )
        })
    }
}

/// Numbers pass through; tokens in the missing set, or that are not numeric, become NaN
///
/// Every token mapped to NaN is recorded in the dimension's map so it can be
/// looked up later. Element types without a NaN fail with a conversion error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissingPolicy {
    missing_set: HashSet<String>,
}

impl MissingPolicy {
    pub fn new<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            missing_set: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokens that are always treated as missing
    pub fn missing_set(&self) -> &HashSet<String> {
        &self.missing_set
    }
}

impl MapPolicy for MissingPolicy {
    fn needs_first_pass(&self) -> bool {
        false
    }

    fn map_first_pass<T: Element>(&mut self, _token: &str, _datatype: &mut Datatype) {}

    fn map_string<T: Element>(
        &mut self,
        token: &str,
        dimension: usize,
        map: &mut DimensionMap,
        datatype: &mut Datatype,
    ) -> Result<T> {
        if !self.missing_set.contains(token) {
            if let Some(value) = T::parse_token(token) {
                return Ok(value);
            }
        }

        if map.get(token).is_none() {
            map.insert(token, f64::NAN);
        }
        *datatype = Datatype::Categorical;

        T::from_mapped(f64::NAN).ok_or_else(|| {
            LoadError::conversion(token, dimension, "element type cannot represent a missing value")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_first_pass_marks_categorical() {
        let mut policy = IncrementPolicy::default();
        let mut datatype = Datatype::Numeric;
        policy.map_first_pass::<f64>("1.5", &mut datatype);
        assert_eq!(datatype, Datatype::Numeric);
        policy.map_first_pass::<f64>("red", &mut datatype);
        assert_eq!(datatype, Datatype::Categorical);
        policy.map_first_pass::<f64>("2", &mut datatype);
        assert_eq!(datatype, Datatype::Categorical);
    }

    #[test]
    fn test_increment_numeric_dimension_turns_categorical() {
        let mut policy = IncrementPolicy::default();
        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Numeric;
        let v: f64 = policy.map_string("2.5", 0, &mut map, &mut datatype).unwrap();
        assert_eq!(v, 2.5);
        assert_eq!(datatype, Datatype::Numeric);

        let v: f64 = policy.map_string("red", 0, &mut map, &mut datatype).unwrap();
        assert_eq!(v, 0.0);
        assert_eq!(datatype, Datatype::Categorical);
    }

    #[test]
    fn test_increment_include_all() {
        let mut policy = IncrementPolicy::new(true);
        let mut datatype = Datatype::Numeric;
        policy.map_first_pass::<f64>("1", &mut datatype);
        assert_eq!(datatype, Datatype::Categorical);

        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Numeric;
        let v: f64 = policy.map_string("7", 0, &mut map, &mut datatype).unwrap();
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_increment_codes_are_stable() {
        let mut policy = IncrementPolicy::default();
        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Categorical;
        let codes: Vec<u32> = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|t| policy.map_string(t, 0, &mut map, &mut datatype).unwrap())
            .collect();
        assert_eq!(codes, vec![0, 1, 0, 2, 1]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_increment_code_overflow() {
        let mut policy = IncrementPolicy::new(true);
        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Categorical;
        for i in 0..256 {
            let _: u8 = policy
                .map_string(&format!("t{}", i), 2, &mut map, &mut datatype)
                .unwrap();
        }
        let err = policy
            .map_string::<u8>("one-too-many", 2, &mut map, &mut datatype)
            .unwrap_err();
        assert!(matches!(err, LoadError::Conversion { dimension: 2, .. }));
    }

    #[test]
    fn test_missing_policy() {
        let mut policy = MissingPolicy::new(["?", "NA"]);
        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Numeric;

        let v: f64 = policy.map_string("3.25", 0, &mut map, &mut datatype).unwrap();
        assert_eq!(v, 3.25);
        assert_eq!(datatype, Datatype::Numeric);

        let v: f64 = policy.map_string("?", 0, &mut map, &mut datatype).unwrap();
        assert!(v.is_nan());
        let v: f64 = policy.map_string("junk", 0, &mut map, &mut datatype).unwrap();
        assert!(v.is_nan());
        assert_eq!(map.len(), 2);
        assert_eq!(datatype, Datatype::Categorical);
    }

    #[test]
    fn test_missing_policy_integer_fails() {
        let mut policy = MissingPolicy::new(["NA"]);
        let mut map = DimensionMap::default();
        let mut datatype = Datatype::Numeric;
        assert_eq!(policy.map_string::<i64>("4", 1, &mut map, &mut datatype).unwrap(), 4);
        let err = policy
            .map_string::<i64>("NA", 1, &mut map, &mut datatype)
            .unwrap_err();
        assert!(matches!(err, LoadError::Conversion { ref token, .. } if token == "NA"));
    }
}
