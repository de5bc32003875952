//! Struct codec (component C3, spec §4.3).
//!
//! Fixed-size fields (`bool`, `int`, `uint`, `double`) pack through the
//! [`BitBuffer`]; variable-size fields (`string`, `rational`) require the
//! buffer to be empty (byte-aligned) before and after they are written,
//! which the struct definition enforces with explicit padding fields.

use crate::binary::{
    strings::{read_string_framed, write_string_framed},
    rationals::{read_rational_framed, write_rational_framed},
    BitBuffer,
};
use crate::datatypes::{CommonType, Scalar, StructAttribute, StructField, StructType};
use crate::error::UmbError;
use num_bigint::{BigInt, BigUint};
use std::collections::BTreeMap;
use std::io::{Read, Write};

fn signed_to_unsigned_bits(value: &BigInt, nbits: u32) -> BigUint {
    if value.sign() != num_bigint::Sign::Minus {
        value.magnitude().clone()
    } else {
        let modulus = BigUint::from(1u8) << nbits;
        let magnitude = (-value).to_biguint().unwrap();
        modulus - magnitude
    }
}

fn unsigned_bits_to_signed(value: &BigUint, nbits: u32) -> BigInt {
    let sign_bit = BigUint::from(1u8) << (nbits - 1);
    if *value < sign_bit {
        BigInt::from(value.clone())
    } else {
        let modulus = BigUint::from(1u8) << nbits;
        BigInt::from(value.clone()) - BigInt::from(modulus)
    }
}

fn scalar_as_bool(v: &Scalar) -> anyhow::Result<bool> {
    match v {
        Scalar::Bool(b) => Ok(*b),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected bool, got {:?}", other.tag_of()))),
    }
}

fn scalar_as_bigint(v: &Scalar) -> anyhow::Result<BigInt> {
    match v {
        Scalar::Int16(x) => Ok(BigInt::from(*x)),
        Scalar::Uint16(x) => Ok(BigInt::from(*x)),
        Scalar::Int32(x) => Ok(BigInt::from(*x)),
        Scalar::Uint32(x) => Ok(BigInt::from(*x)),
        Scalar::Int64(x) => Ok(BigInt::from(*x)),
        Scalar::Uint64(x) => Ok(BigInt::from(*x)),
        Scalar::Int(x) => Ok(x.clone()),
        Scalar::Uint(x) => Ok(BigInt::from(x.clone())),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected integer, got {:?}", other.tag_of()))),
    }
}

fn scalar_as_f64(v: &Scalar) -> anyhow::Result<f64> {
    match v {
        Scalar::Double(d) => Ok(*d),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected double, got {:?}", other.tag_of()))),
    }
}

fn scalar_as_string(v: &Scalar) -> anyhow::Result<String> {
    match v {
        Scalar::String(s) => Ok(s.clone()),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected string, got {:?}", other.tag_of()))),
    }
}

fn scalar_as_rational(v: &Scalar) -> anyhow::Result<crate::datatypes::RationalValue> {
    match v {
        Scalar::Rational(r) => Ok(r.clone()),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected rational, got {:?}", other.tag_of()))),
    }
}

fn lookup<'a>(record: &'a BTreeMap<String, Scalar>, attr: &StructAttribute) -> anyhow::Result<&'a Scalar> {
    record
        .get(&attr.name)
        .ok_or_else(|| UmbError::SchemaViolation(format!("missing struct field {}", attr.name)).into())
}

/// Pack `record` (a map of attribute name to value) according to `ty`.
pub fn struct_pack(ty: &StructType, record: &BTreeMap<String, Scalar>) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = BitBuffer::new();
    for field in &ty.fields {
        match field {
            StructField::Padding(k) => {
                buf.push_uint(&BigUint::from(0u8), k.get());
                buf.drain_full_bytes(&mut out);
            }
            StructField::Attribute(attr) if attr.is_variable_size() => {
                if !buf.is_empty() {
                    anyhow::bail!(UmbError::BufferNotAligned(format!(
                        "field {} requires byte alignment; add a padding field before it",
                        attr.name
                    )));
                }
                let value = lookup(record, attr)?;
                match attr.ty {
                    CommonType::String => write_string_framed(&mut out, &scalar_as_string(value)?)?,
                    CommonType::Rational => write_rational_framed(&mut out, &scalar_as_rational(value)?)?,
                    _ => unreachable!("validated at StructAttribute construction"),
                }
            }
            StructField::Attribute(attr) => {
                let value = lookup(record, attr)?;
                let size = attr.size.expect("fixed-size attribute always declares size");
                match attr.ty {
                    CommonType::Bool => buf.push_uint(&BigUint::from(scalar_as_bool(value)? as u8), size),
                    CommonType::Uint => {
                        let v = scalar_as_bigint(value)?;
                        buf.push_uint(&v.to_biguint().ok_or_else(|| {
                            UmbError::IntegerOutOfRange { ty: "uint struct field", value: v.to_string() }
                        })?, size);
                    }
                    CommonType::Int => buf.push_uint(&signed_to_unsigned_bits(&scalar_as_bigint(value)?, size), size),
                    CommonType::Double => buf.push_uint(&BigUint::from(scalar_as_f64(value)?.to_bits()), 64),
                    other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} unsupported in struct"))),
                }
                buf.drain_full_bytes(&mut out);
            }
        }
    }
    if !buf.is_empty() {
        anyhow::bail!(UmbError::BufferNotAligned(
            "struct definition leaves a non-byte-aligned trailing field; add trailing padding".to_string()
        ));
    }
    Ok(out)
}

/// Unpack one struct instance from `r` according to `ty`.
pub fn struct_unpack<R: Read>(r: &mut R, ty: &StructType) -> anyhow::Result<BTreeMap<String, Scalar>> {
    let mut record = BTreeMap::new();
    let mut buf = BitBuffer::new();
    for field in &ty.fields {
        match field {
            StructField::Padding(k) => {
                buf.pull_bits(r, k.get() as usize)?;
            }
            StructField::Attribute(attr) if attr.is_variable_size() => {
                if !buf.is_empty() {
                    anyhow::bail!(UmbError::BufferNotAligned(format!(
                        "field {} expected at a byte boundary",
                        attr.name
                    )));
                }
                let value = match attr.ty {
                    CommonType::String => Scalar::String(read_string_framed(r)?),
                    CommonType::Rational => Scalar::Rational(read_rational_framed(r)?),
                    _ => unreachable!("validated at StructAttribute construction"),
                };
                record.insert(attr.name.clone(), value);
            }
            StructField::Attribute(attr) => {
                let size = attr.size.expect("fixed-size attribute always declares size");
                let value = match attr.ty {
                    CommonType::Bool => Scalar::Bool(buf.pull_uint(r, size)? != BigUint::from(0u8)),
                    CommonType::Uint => Scalar::Uint(buf.pull_uint(r, size)?),
                    CommonType::Int => Scalar::Int(unsigned_bits_to_signed(&buf.pull_uint(r, size)?, size)),
                    CommonType::Double => Scalar::Double(f64::from_bits({
                        let bits = buf.pull_uint(r, 64)?;
                        bits.to_u64_digits().first().copied().unwrap_or(0)
                    })),
                    other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} unsupported in struct"))),
                };
                record.insert(attr.name.clone(), value);
            }
        }
    }
    if !buf.is_empty() {
        anyhow::bail!(UmbError::BufferNotAligned("trailing unconsumed bits after struct".to_string()));
    }
    Ok(record)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::StructField as F;
    use std::num::NonZeroU32;

    fn sample_type() -> StructType {
        // 3-bit flag, 5-bit padding (byte-align), then a string.
        StructType::new(
            8,
            vec![
                F::Attribute(StructAttribute::new("flag", CommonType::Uint, Some(3)).unwrap()),
                F::Padding(NonZeroU32::new(5).unwrap()),
                F::Attribute(StructAttribute::new("label", CommonType::String, None).unwrap()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn pack_unpack_roundtrip() {
        let ty = sample_type();
        let mut record = BTreeMap::new();
        record.insert("flag".to_string(), Scalar::Uint(BigUint::from(5u8)));
        record.insert("label".to_string(), Scalar::String("hi".to_string()));

        let bytes = struct_pack(&ty, &record).unwrap();
        let mut cursor = std::io::Cursor::new(bytes);
        let decoded = struct_unpack(&mut cursor, &ty).unwrap();
        assert_eq!(decoded.get("flag"), Some(&Scalar::Uint(BigUint::from(5u8))));
        assert_eq!(decoded.get("label"), Some(&Scalar::String("hi".to_string())));
    }

    #[test]
    fn missing_padding_before_variable_field_fails() {
        let ty = StructType::new(
            8,
            vec![
                F::Attribute(StructAttribute::new("flag", CommonType::Uint, Some(3)).unwrap()),
                F::Attribute(StructAttribute::new("label", CommonType::String, None).unwrap()),
            ],
        )
        .unwrap();
        let mut record = BTreeMap::new();
        record.insert("flag".to_string(), Scalar::Uint(BigUint::from(1u8)));
        record.insert("label".to_string(), Scalar::String("x".to_string()));
        assert!(struct_pack(&ty, &record).is_err());
    }

    #[test]
    fn signed_field_roundtrips_negative_value() {
        let ty = StructType::new(
            8,
            vec![F::Attribute(StructAttribute::new("v", CommonType::Int, Some(8)).unwrap())],
        )
        .unwrap();
        let mut record = BTreeMap::new();
        record.insert("v".to_string(), Scalar::Int(BigInt::from(-5)));
        let bytes = struct_pack(&ty, &record).unwrap();
        let mut cursor = std::io::Cursor::new(bytes);
        let decoded = struct_unpack(&mut cursor, &ty).unwrap();
        assert_eq!(decoded.get("v"), Some(&Scalar::Int(BigInt::from(-5))));
    }
}
