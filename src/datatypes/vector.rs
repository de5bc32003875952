//! Homogeneous vector type inference helpers used by the vector codec (C4).

use crate::datatypes::promotion::common_numeric;
use crate::datatypes::{CommonType, Scalar};

/// Whether every element of `values` already has tag `ty` without needing
/// promotion.
pub fn is_vector_of_common_type(values: &[Scalar], ty: CommonType) -> bool {
    values.iter().all(|v| v.tag_of() == ty)
}

/// The common numeric type of a vector's elements, without performing any
/// promotion (a read-only query used by `ExplicitAts::branch_probability_type`
/// and `exit_rate_type`).
pub fn vector_common_numeric_type(values: &[Scalar]) -> anyhow::Result<CommonType> {
    let mut tags: Vec<CommonType> = Vec::new();
    for v in values {
        let t = v.tag_of();
        if !tags.contains(&t) {
            tags.push(t);
        }
    }
    if tags.len() == 1 {
        return Ok(tags[0]);
    }
    common_numeric(&tags)
}
