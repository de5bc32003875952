//! The closed value-type lattice (component C1): [`CommonType`] tags,
//! [`Scalar`] values, and [`Numeric`] as the promotable subset of scalars.

pub mod interval;
pub mod promotion;
pub mod struct_type;
pub mod vector;

pub use interval::Interval;
pub use struct_type::{StructAttribute, StructField, StructType};

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

/// A rational value stored as raw, unreduced numerator/denominator terms.
///
/// The wire format never reduces a rational to lowest terms: the term size
/// is chosen to fit the larger of numerator/denominator and both are
/// written verbatim, so equality here is exact-term equality, not
/// mathematical equality after reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalValue {
    pub numerator: BigInt,
    pub denominator: BigUint,
}

impl RationalValue {
    pub fn new(numerator: BigInt, denominator: BigUint) -> Self {
        Self { numerator, denominator }
    }

    pub fn to_f64(&self) -> f64 {
        // Exact enough for comparisons; callers that need bit-exact
        // reproduction of the original double should not round-trip
        // through this conversion.
        let num = self.numerator.to_string().parse::<f64>().unwrap_or(f64::NAN);
        let den = self.denominator.to_string().parse::<f64>().unwrap_or(f64::NAN);
        num / den
    }
}

/// The closed set of common value types (spec §3.1), tagged with their
/// wire string for the manifest/annotation type fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommonType {
    Bool,
    Bytes,
    String,
    Json,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int,
    Uint,
    Double,
    Rational,
    DoubleInterval,
    RationalInterval,
    Struct,
}

impl CommonType {
    pub fn is_fixed_size_integer(&self) -> bool {
        matches!(
            self,
            CommonType::Int16 | CommonType::Uint16 | CommonType::Int32 | CommonType::Uint32 | CommonType::Int64 | CommonType::Uint64
        )
    }

    pub fn is_variable_size_integer(&self) -> bool {
        matches!(self, CommonType::Int | CommonType::Uint)
    }

    pub fn is_integer(&self) -> bool {
        self.is_fixed_size_integer() || self.is_variable_size_integer()
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, CommonType::DoubleInterval | CommonType::RationalInterval)
    }

    /// The scalar base type underlying an interval type.
    pub fn interval_base_type(&self) -> anyhow::Result<CommonType> {
        match self {
            CommonType::DoubleInterval => Ok(CommonType::Double),
            CommonType::RationalInterval => Ok(CommonType::Rational),
            other => anyhow::bail!(crate::error::UmbError::UnsupportedType(format!(
                "{other:?} is not an interval type"
            ))),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                CommonType::Double | CommonType::Rational | CommonType::DoubleInterval | CommonType::RationalInterval
            )
    }
}

/// A concrete value belonging to one of the common types.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    Json(serde_json::Value),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Int(BigInt),
    Uint(BigUint),
    Double(f64),
    Rational(RationalValue),
    DoubleInterval(Interval<f64>),
    RationalInterval(Interval<RationalValue>),
    Struct(Vec<(String, Scalar)>),
}

impl Scalar {
    /// The common type tag of this value (`tag_of` in the spec).
    pub fn tag_of(&self) -> CommonType {
        match self {
            Scalar::Bool(_) => CommonType::Bool,
            Scalar::Bytes(_) => CommonType::Bytes,
            Scalar::String(_) => CommonType::String,
            Scalar::Json(_) => CommonType::Json,
            Scalar::Int16(_) => CommonType::Int16,
            Scalar::Uint16(_) => CommonType::Uint16,
            Scalar::Int32(_) => CommonType::Int32,
            Scalar::Uint32(_) => CommonType::Uint32,
            Scalar::Int64(_) => CommonType::Int64,
            Scalar::Uint64(_) => CommonType::Uint64,
            Scalar::Int(_) => CommonType::Int,
            Scalar::Uint(_) => CommonType::Uint,
            Scalar::Double(_) => CommonType::Double,
            Scalar::Rational(_) => CommonType::Rational,
            Scalar::DoubleInterval(_) => CommonType::DoubleInterval,
            Scalar::RationalInterval(_) => CommonType::RationalInterval,
            Scalar::Struct(_) => CommonType::Struct,
        }
    }

    /// Cheap structural fit check (`fits` in the spec): does this value
    /// plausibly belong to `ty`? Range checks are deferred to the encoder.
    pub fn fits(&self, ty: CommonType) -> bool {
        if self.tag_of() == ty {
            return true;
        }
        // Any integer literal is accepted as an instance of any
        // integer-tagged type; range is enforced by the encoder.
        self.tag_of().is_integer() && ty.is_integer()
    }
}

/// The promotable numeric subset of [`Scalar`] (used by [`promotion`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Int(BigInt),
    Double(f64),
    Rational(RationalValue),
    DoubleInterval(Interval<f64>),
    RationalInterval(Interval<RationalValue>),
}

impl Numeric {
    pub fn tag_of(&self) -> CommonType {
        match self {
            Numeric::Int(_) => CommonType::Int,
            Numeric::Double(_) => CommonType::Double,
            Numeric::Rational(_) => CommonType::Rational,
            Numeric::DoubleInterval(_) => CommonType::DoubleInterval,
            Numeric::RationalInterval(_) => CommonType::RationalInterval,
        }
    }
}

impl TryFrom<Scalar> for Numeric {
    type Error = anyhow::Error;

    fn try_from(value: Scalar) -> Result<Self, Self::Error> {
        Ok(match value {
            Scalar::Int16(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Uint16(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Int32(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Uint32(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Int64(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Uint64(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Int(v) => Numeric::Int(v),
            Scalar::Uint(v) => Numeric::Int(BigInt::from(v)),
            Scalar::Double(v) => Numeric::Double(v),
            Scalar::Rational(v) => Numeric::Rational(v),
            Scalar::DoubleInterval(v) => Numeric::DoubleInterval(v),
            Scalar::RationalInterval(v) => Numeric::RationalInterval(v),
            other => anyhow::bail!(crate::error::UmbError::UnsupportedType(format!(
                "{:?} is not numeric",
                other.tag_of()
            ))),
        })
    }
}
