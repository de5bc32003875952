//! The numeric promotion lattice (spec §3.1, §4.1, §9 design note).
//!
//! `int <= double <= double-interval` and `int <= rational <=
//! rational-interval`; a mix containing `rational` and any interval
//! promotes to `rational-interval`; a mixed set containing `string`
//! promotes to `string` regardless of the other members; singleton sets
//! yield themselves. There is no silent promotion outside this table.

use crate::datatypes::{CommonType, Interval, Numeric, RationalValue, Scalar};
use crate::error::UmbError;
use num_bigint::{BigInt, BigUint, Sign};

/// Exact IEEE-754 binary64 decomposition of `v` as `(mantissa, exponent,
/// sign)` such that `v == sign * mantissa * 2^exponent`.
///
/// Pinned per the spec's design note: float -> rational promotion must use
/// the exact binary fraction, not a decimal-approximating conversion.
fn integer_decode(v: f64) -> (u64, i32, i8) {
    let bits = v.to_bits();
    let sign: i8 = if bits >> 63 == 0 { 1 } else { -1 };
    let mut exponent = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = if exponent == 0 {
        (bits & 0xf_ffff_ffff_ffff) << 1
    } else {
        (bits & 0xf_ffff_ffff_ffff) | 0x10_0000_0000_0000
    };
    exponent -= 1075;
    (mantissa, exponent, sign)
}

/// Convert a finite `f64` into the exact rational it represents.
pub fn double_to_exact_rational(v: f64) -> anyhow::Result<RationalValue> {
    if !v.is_finite() {
        anyhow::bail!(UmbError::CannotPromote {
            from: "double".to_string(),
            to: "rational".to_string(),
        });
    }
    let (mantissa, exponent, sign) = integer_decode(v);
    let mantissa = BigInt::from(mantissa) * BigInt::from(sign);
    let (numerator, denominator) = if exponent >= 0 {
        (mantissa * (BigInt::from(1u8) << exponent as u32), BigUint::from(1u8))
    } else {
        let denom = BigUint::from(1u8) << (-exponent) as u32;
        (mantissa, denom)
    };
    Ok(RationalValue::new(numerator, denominator))
}

fn rational_to_f64(r: &RationalValue) -> f64 {
    r.to_f64()
}

/// Promote `value` to the numeric type `target`. Integer -> float uses the
/// nearest float; float -> rational uses the exact IEEE binary fraction;
/// widening int -> any numeric target is exact.
pub fn promote(value: Numeric, target: CommonType) -> anyhow::Result<Numeric> {
    if value.tag_of() == target {
        return Ok(value);
    }
    Ok(match (value, target) {
        (Numeric::Int(i), CommonType::Double) => Numeric::Double(bigint_to_f64(&i)),
        (Numeric::Int(i), CommonType::Rational) => {
            Numeric::Rational(RationalValue::new(i, BigUint::from(1u8)))
        }
        (Numeric::Int(i), CommonType::DoubleInterval) => {
            let d = bigint_to_f64(&i);
            Numeric::DoubleInterval(Interval::new(d, d)?)
        }
        (Numeric::Int(i), CommonType::RationalInterval) => {
            let r = RationalValue::new(i, BigUint::from(1u8));
            Numeric::RationalInterval(Interval::new(r.clone(), r)?)
        }
        (Numeric::Double(d), CommonType::DoubleInterval) => Numeric::DoubleInterval(Interval::new(d, d)?),
        (Numeric::Double(d), CommonType::Rational) => Numeric::Rational(double_to_exact_rational(d)?),
        (Numeric::Double(d), CommonType::RationalInterval) => {
            let r = double_to_exact_rational(d)?;
            Numeric::RationalInterval(Interval::new(r.clone(), r)?)
        }
        (Numeric::Rational(r), CommonType::RationalInterval) => {
            Numeric::RationalInterval(Interval::new(r.clone(), r)?)
        }
        (Numeric::Rational(r), CommonType::Double) => Numeric::Double(rational_to_f64(&r)),
        (Numeric::Rational(r), CommonType::DoubleInterval) => {
            let d = rational_to_f64(&r);
            Numeric::DoubleInterval(Interval::new(d, d)?)
        }
        (Numeric::DoubleInterval(iv), CommonType::RationalInterval) => {
            let l = double_to_exact_rational(*iv.left())?;
            let r = double_to_exact_rational(*iv.right())?;
            Numeric::RationalInterval(Interval::new(l, r)?)
        }
        (value, target) => anyhow::bail!(UmbError::CannotPromote {
            from: format!("{:?}", value.tag_of()),
            to: format!("{target:?}"),
        }),
    })
}

fn bigint_to_f64(i: &BigInt) -> f64 {
    let (sign, digits) = i.to_u64_digits();
    let mut acc = 0f64;
    for &d in digits.iter().rev() {
        acc = acc * (u64::MAX as f64 + 1.0) + d as f64;
    }
    if sign == Sign::Minus {
        -acc
    } else {
        acc
    }
}

/// Least upper bound of a set of numeric common types (`common_numeric` in
/// the spec). Errors on an empty set or a non-numeric member, unless the
/// set contains `string`, in which case the result is `string`.
pub fn common_numeric(types: &[CommonType]) -> anyhow::Result<CommonType> {
    if types.is_empty() {
        anyhow::bail!(UmbError::SchemaViolation("empty type set has no common type".to_string()));
    }
    if types.contains(&CommonType::String) {
        return Ok(CommonType::String);
    }
    let mut has_rational = false;
    let mut has_interval = false;
    let mut has_double = false;
    let mut rank = 0u8; // 0 = int only
    for ty in types {
        match ty {
            t if t.is_integer() => {}
            CommonType::Double => {
                has_double = true;
                rank = rank.max(1);
            }
            CommonType::Rational => {
                has_rational = true;
                rank = rank.max(1);
            }
            CommonType::DoubleInterval => {
                has_double = true;
                has_interval = true;
                rank = rank.max(2);
            }
            CommonType::RationalInterval => {
                has_rational = true;
                has_interval = true;
                rank = rank.max(2);
            }
            other => anyhow::bail!(UmbError::UnsupportedType(format!(
                "{other:?} is not numeric, cannot mix into a numeric common type"
            ))),
        }
    }
    if types.len() == 1 {
        return Ok(types[0]);
    }
    Ok(match (rank, has_rational, has_double, has_interval) {
        (0, _, _, _) => CommonType::Int,
        (_, true, _, true) => CommonType::RationalInterval,
        (_, true, true, false) => CommonType::RationalInterval,
        (_, true, false, false) => CommonType::Rational,
        (_, false, _, true) => CommonType::DoubleInterval,
        (_, false, true, false) => CommonType::Double,
        _ => CommonType::Int,
    })
}

/// Infer the common promotion type of a homogeneous-or-mixed vector of
/// scalars and promote every element to it (`promote_vector` in the spec).
pub fn promote_vector(values: Vec<Scalar>) -> anyhow::Result<(CommonType, Vec<Scalar>)> {
    let tags: Vec<CommonType> = values.iter().map(|v| v.tag_of()).collect();
    let unique: Vec<CommonType> = {
        let mut u = Vec::new();
        for t in &tags {
            if !u.contains(t) {
                u.push(*t);
            }
        }
        u
    };
    let target = if unique.len() == 1 {
        unique[0]
    } else {
        common_numeric(&unique)?
    };
    if target == CommonType::String {
        // strings are not promoted element-wise; every element must
        // already be a string (or JSON promoted to string text upstream).
        for v in &values {
            if v.tag_of() != CommonType::String {
                anyhow::bail!(UmbError::CannotPromote {
                    from: format!("{:?}", v.tag_of()),
                    to: "string".to_string(),
                });
            }
        }
        return Ok((target, values));
    }
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        if v.tag_of() == target {
            out.push(v);
            continue;
        }
        let numeric: Numeric = v.try_into()?;
        out.push(numeric_to_scalar(promote(numeric, target)?));
    }
    Ok((target, out))
}

fn numeric_to_scalar(n: Numeric) -> Scalar {
    match n {
        Numeric::Int(v) => Scalar::Int(v),
        Numeric::Double(v) => Scalar::Double(v),
        Numeric::Rational(v) => Scalar::Rational(v),
        Numeric::DoubleInterval(v) => Scalar::DoubleInterval(v),
        Numeric::RationalInterval(v) => Scalar::RationalInterval(v),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_fraction_of_one_half() {
        let r = double_to_exact_rational(0.5).unwrap();
        assert_eq!(r.numerator, BigInt::from(1));
        assert_eq!(r.denominator, BigUint::from(2u8));
    }

    #[test]
    fn common_numeric_rational_and_interval_promotes_to_rational_interval() {
        let t = common_numeric(&[CommonType::Rational, CommonType::DoubleInterval]).unwrap();
        assert_eq!(t, CommonType::RationalInterval);
    }

    #[test]
    fn common_numeric_singleton_is_itself() {
        assert_eq!(common_numeric(&[CommonType::Int32]).unwrap(), CommonType::Int32);
    }

    #[test]
    fn common_numeric_empty_set_errors() {
        assert!(common_numeric(&[]).is_err());
    }
}
