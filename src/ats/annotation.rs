//! Façade-level annotation kinds (spec §3.4/§3.5): rewards, atomic
//! propositions, and observations, each a named typed mapping from one
//! entity kind to a vector of values.
//!
//! Grounded on `original_source/umbi/ats/annotation.py`'s three dataclasses;
//! `ObservationAnnotation` is promoted to a first-class kind alongside
//! rewards/APs rather than left implicit.

use crate::datatypes::{CommonType, Scalar};
use crate::error::UmbError;
use crate::index::transition_system::AppliesTo;

#[derive(Debug, Clone, PartialEq)]
pub struct RewardAnnotation {
    pub name: String,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub ty: CommonType,
    pub values: Vec<Scalar>,
    pub applies_to: AppliesTo,
}

impl RewardAnnotation {
    pub fn new(name: impl Into<String>, ty: CommonType, applies_to: AppliesTo, values: Vec<Scalar>) -> anyhow::Result<Self> {
        if !ty.is_numeric() {
            anyhow::bail!(UmbError::SchemaViolation(format!("reward annotation type must be numeric, got {ty:?}")));
        }
        Ok(Self { name: name.into(), alias: None, description: None, ty, values, applies_to })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomicPropositionAnnotation {
    pub name: String,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub values: Vec<bool>,
    pub applies_to: AppliesTo,
}

impl AtomicPropositionAnnotation {
    pub fn new(name: impl Into<String>, applies_to: AppliesTo, values: Vec<bool>) -> Self {
        Self { name: name.into(), alias: None, description: None, values, applies_to }
    }
}

/// A non-negative integer annotation bounded by the transition system's
/// declared `#observations`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationAnnotation {
    pub name: String,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub values: Vec<u64>,
    pub applies_to: AppliesTo,
}

impl ObservationAnnotation {
    pub fn new(name: impl Into<String>, applies_to: AppliesTo, values: Vec<u64>, num_observations: u64) -> anyhow::Result<Self> {
        if let Some(bad) = values.iter().find(|v| **v >= num_observations) {
            anyhow::bail!(UmbError::StructuralInvariant(format!(
                "observation value {bad} is not in [0, {num_observations})"
            )));
        }
        Ok(Self { name: name.into(), alias: None, description: None, values, applies_to })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reward_annotation_rejects_non_numeric_type() {
        assert!(RewardAnnotation::new("r", CommonType::String, AppliesTo::States, vec![]).is_err());
    }

    #[test]
    fn observation_annotation_rejects_out_of_bound_value() {
        assert!(ObservationAnnotation::new("obs", AppliesTo::States, vec![0, 3], 3).is_err());
        assert!(ObservationAnnotation::new("obs", AppliesTo::States, vec![0, 2], 3).is_ok());
    }
}
