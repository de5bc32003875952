//! State-valuation variables with domain tracking (spec §3.5), a
//! non-wire-format convenience layered on top of the struct-typed
//! valuations for display/introspection.
//!
//! Grounded on `original_source/umbi/ats/variable_valuations.py`'s
//! `Variable`, which tracks an optional sorted domain derived from the
//! observed values of a struct attribute across all items.

use crate::datatypes::{CommonType, Scalar, StructAttribute};
use num_bigint::BigInt;

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub attribute: StructAttribute,
    domain: Option<Vec<BigInt>>,
}

impl Variable {
    pub fn new(attribute: StructAttribute) -> Self {
        Self { attribute, domain: None }
    }

    pub fn domain(&self) -> Option<&[BigInt]> {
        self.domain.as_deref()
    }

    /// Recomputes the variable's domain from the values this item's
    /// attribute took across a full item-valuations table, sorted and
    /// deduplicated. Only meaningful for integer-typed attributes; other
    /// types leave the domain unset.
    pub fn sync_domain(&mut self, values: &[Scalar]) {
        if !matches!(self.attribute.ty, CommonType::Int | CommonType::Uint | CommonType::Int16 | CommonType::Uint16
            | CommonType::Int32 | CommonType::Uint32 | CommonType::Int64 | CommonType::Uint64)
        {
            self.domain = None;
            return;
        }
        let mut seen: Vec<BigInt> = values.iter().filter_map(scalar_as_bigint).collect();
        seen.sort();
        seen.dedup();
        self.domain = Some(seen);
    }
}

fn scalar_as_bigint(v: &Scalar) -> Option<BigInt> {
    Some(match v {
        Scalar::Int16(x) => BigInt::from(*x),
        Scalar::Uint16(x) => BigInt::from(*x),
        Scalar::Int32(x) => BigInt::from(*x),
        Scalar::Uint32(x) => BigInt::from(*x),
        Scalar::Int64(x) => BigInt::from(*x),
        Scalar::Uint64(x) => BigInt::from(*x),
        Scalar::Int(x) => x.clone(),
        Scalar::Uint(x) => BigInt::from(x.clone()),
        _ => return None,
    })
}

/// A per-entity table of valuation records (spec §3.4's "variable
/// valuation" row), one record per item of the entity kind it applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemValuations {
    pub records: Vec<Scalar>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn domain_sync_sorts_and_dedups_integers() {
        let attr = StructAttribute::new("x", CommonType::Int32, Some(32)).unwrap();
        let mut var = Variable::new(attr);
        var.sync_domain(&[Scalar::Int32(3), Scalar::Int32(1), Scalar::Int32(1), Scalar::Int32(2)]);
        assert_eq!(var.domain().unwrap(), &[BigInt::from(1), BigInt::from(2), BigInt::from(3)]);
    }

    #[test]
    fn domain_unset_for_non_integer_attribute() {
        let attr = StructAttribute::new("s", CommonType::String, None).unwrap();
        let mut var = Variable::new(attr);
        var.sync_domain(&[Scalar::String("a".to_string())]);
        assert!(var.domain().is_none());
    }
}
