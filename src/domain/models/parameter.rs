//! Tunable parameters and the configuration vectors built from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::errors::SetupError;

/// One candidate assignment of values to all parameters, in parameter order.
pub type Configuration = Vec<i64>;

/// Inclusive integer range `[lo, hi]`.
///
/// Serialized as a two-element array so that config files read `range: [50, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Bounds {
    pub lo: i64,
    pub hi: i64,
}

impl Bounds {
    /// Inclusive range `[lo, hi]`.
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    /// Inclusive at both ends.
    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Number of representable values minus one.
    pub fn width(&self) -> i64 {
        self.hi - self.lo
    }

    /// Clamp `value` into the range.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.lo, self.hi)
    }

    /// `self ⊆ other`
    pub fn is_within(&self, other: &Bounds) -> bool {
        other.lo <= self.lo && self.hi <= other.hi
    }
}

impl From<[i64; 2]> for Bounds {
    fn from([lo, hi]: [i64; 2]) -> Self {
        Self { lo, hi }
    }
}

impl From<Bounds> for [i64; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.lo, bounds.hi]
    }
}

/// Check a configuration coordinate-by-coordinate against `bounds`.
///
/// A configuration whose length differs from `bounds` is never inside them.
pub fn within_bounds(configuration: &[i64], bounds: &[Bounds]) -> bool {
    configuration.len() == bounds.len()
        && configuration
            .iter()
            .zip(bounds)
            .all(|(value, range)| range.contains(*value))
}

/// Immutable descriptor of one tunable engine option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub range: Bounds,
    pub default: i64,
}

impl Parameter {
    /// Unchecked; [`ParameterSpace::new`] validates.
    pub fn new(name: impl Into<String>, range: (i64, i64), default: i64) -> Self {
        Self {
            name: name.into(),
            range: Bounds::new(range.0, range.1),
            default,
        }
    }

    fn validate(&self) -> Result<(), SetupError> {
        if self.name.trim().is_empty() {
            return Err(SetupError::InvalidParameter {
                name: self.name.clone(),
                reason: "name cannot be empty".to_string(),
            });
        }
        if self.range.lo > self.range.hi {
            return Err(SetupError::InvalidParameter {
                name: self.name.clone(),
                reason: format!(
                    "lower bound {} exceeds upper bound {}",
                    self.range.lo, self.range.hi
                ),
            });
        }
        if !self.range.contains(self.default) {
            return Err(SetupError::InvalidParameter {
                name: self.name.clone(),
                reason: format!(
                    "default {} lies outside [{}, {}]",
                    self.default, self.range.lo, self.range.hi
                ),
            });
        }
        Ok(())
    }
}

/// The ordered, validated parameter list of one session.
///
/// Its order defines the coordinate order of every [`Configuration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
}

impl ParameterSpace {
    /// Rejects an empty list, duplicate names and defaults outside their range.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, SetupError> {
        if parameters.is_empty() {
            return Err(SetupError::NoParameters);
        }

        let mut seen = HashSet::new();
        for parameter in &parameters {
            parameter.validate()?;
            if !seen.insert(parameter.name.as_str()) {
                return Err(SetupError::InvalidParameter {
                    name: parameter.name.clone(),
                    reason: "duplicate parameter name".to_string(),
                });
            }
        }

        Ok(Self { parameters })
    }

    /// The parameters in configuration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// The range of each coordinate.
    pub fn bounds(&self) -> Vec<Bounds> {
        self.parameters.iter().map(|p| p.range).collect()
    }

    /// The default configuration.
    pub fn defaults(&self) -> Configuration {
        self.parameters.iter().map(|p| p.default).collect()
    }

    /// Whether every coordinate lies inside its range.
    pub fn contains(&self, configuration: &[i64]) -> bool {
        within_bounds(configuration, &self.bounds())
    }

    /// Pair each coordinate with its parameter name.
    pub fn named<'a>(
        &'a self,
        configuration: &'a [i64],
    ) -> impl Iterator<Item = (&'a str, i64)> + 'a {
        self.names().zip(configuration.iter().copied())
    }
}

/// The JavaScriptCore inlining heuristics tuned by default.
pub fn jsc_inlining_parameters() -> Vec<Parameter> {
    vec![
        Parameter::new("maximumFunctionForCallInlineCandidateBytecodeCost", (50, 180), 77),
        Parameter::new("maximumOptimizationCandidateBytecodeCost", (65, 150_000), 42_403),
        Parameter::new(
            "maximumFunctionForClosureCallInlineCandidateBytecodeCost",
            (50, 150),
            68,
        ),
        Parameter::new("maximumInliningCallerBytecodeCost", (500, 15_000), 9_912),
        Parameter::new("maximumInliningDepth", (2, 8), 8),
        Parameter::new("maximumInliningRecursion", (1, 5), 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        let space = ParameterSpace::new(jsc_inlining_parameters()).unwrap();
        assert_eq!(space.len(), 6);
        assert!(space.contains(&space.defaults()));
    }

    #[test]
    fn default_outside_bounds_is_rejected() {
        let err = ParameterSpace::new(vec![Parameter::new("depth", (2, 8), 9)]).unwrap_err();
        match err {
            SetupError::InvalidParameter { name, reason } => {
                assert_eq!(name, "depth");
                assert!(reason.contains("outside"));
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = ParameterSpace::new(vec![Parameter::new("depth", (8, 2), 5)]).unwrap_err();
        assert!(matches!(err, SetupError::InvalidParameter { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ParameterSpace::new(vec![
            Parameter::new("depth", (2, 8), 4),
            Parameter::new("depth", (1, 3), 2),
        ])
        .unwrap_err();
        assert!(matches!(err, SetupError::InvalidParameter { .. }));
    }

    #[test]
    fn empty_space_is_rejected() {
        assert!(matches!(
            ParameterSpace::new(vec![]),
            Err(SetupError::NoParameters)
        ));
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = [Bounds::new(50, 180)];
        assert!(within_bounds(&[50], &bounds));
        assert!(within_bounds(&[180], &bounds));
        assert!(within_bounds(&[120], &bounds));
        assert!(!within_bounds(&[181], &bounds));
        assert!(!within_bounds(&[120, 1], &bounds));
    }

    #[test]
    fn bounds_parse_from_pair() {
        let parsed: Parameter =
            serde_yaml::from_str("name: depth\nrange: [2, 8]\ndefault: 8\n").unwrap();
        assert_eq!(parsed.range, Bounds::new(2, 8));
    }
}
