//! `annotations` section of the manifest (spec §4.7).

use crate::index::transition_system::AppliesTo;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationType {
    Bool,
    Double,
    Rational,
    DoubleInterval,
    RationalInterval,
    String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub alias: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "applies-to")]
    pub applies_to: Option<Vec<AppliesTo>>,
    #[serde(rename = "type")]
    pub ty: Option<AnnotationType>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Insertion-order-preserving maps so a round-trip reproduces the same
/// annotation iteration order (spec §5's ordering requirement).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rewards: IndexMap<String, Annotation>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aps: IndexMap<String, Annotation>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub observations: IndexMap<String, Annotation>,
}
