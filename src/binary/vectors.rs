//! Vector codec (component C4, spec §4.4): homogeneous sequences to bytes,
//! with an auxiliary chunk CSR emitted whenever per-element sizes vary.

use crate::binary::booleans::{read_bool_vec, write_bool_vec};
use crate::binary::floats::{read_double, write_double};
use crate::binary::integers::{read_fixed_int, write_fixed_int};
use crate::binary::rationals::{read_rational_at_size, write_rational_at_size};
use crate::binary::structs::{struct_pack, struct_unpack};
use crate::datatypes::{CommonType, RationalValue, Scalar, StructType};
use crate::error::UmbError;
use num_bigint::{BigInt, BigUint};
use std::collections::BTreeMap;

fn fixed_width_bytes(ty: CommonType) -> Option<usize> {
    match ty {
        CommonType::Int16 | CommonType::Uint16 => Some(2),
        CommonType::Int32 | CommonType::Uint32 => Some(4),
        CommonType::Int64 | CommonType::Uint64 => Some(8),
        CommonType::Double => Some(8),
        CommonType::DoubleInterval => Some(16),
        _ => None,
    }
}

fn struct_to_record(v: &Scalar) -> anyhow::Result<BTreeMap<String, Scalar>> {
    match v {
        Scalar::Struct(fields) => Ok(fields.iter().cloned().collect()),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected struct, got {:?}", other.tag_of()))),
    }
}

fn record_to_struct(record: BTreeMap<String, Scalar>) -> Scalar {
    Scalar::Struct(record.into_iter().collect())
}

/// Encode a homogeneous vector of `values` of common type `ty`. Returns the
/// byte payload and, when elements vary in size, the chunk CSR.
pub fn vector_to_bytes(
    values: &[Scalar],
    ty: CommonType,
    struct_ty: Option<&StructType>,
) -> anyhow::Result<(Vec<u8>, Option<Vec<u64>>)> {
    if values.is_empty() {
        return Ok((Vec::new(), None));
    }
    if ty == CommonType::Bool {
        let bits: anyhow::Result<Vec<bool>> = values
            .iter()
            .map(|v| match v {
                Scalar::Bool(b) => Ok(*b),
                other => anyhow::bail!(UmbError::UnsupportedType(format!("expected bool, got {:?}", other.tag_of()))),
            })
            .collect();
        return Ok((write_bool_vec(&bits?), None));
    }
    if let Some(width) = fixed_width_bytes(ty) {
        let mut out = Vec::with_capacity(values.len() * width);
        for v in values {
            match (ty, v) {
                (CommonType::Double, Scalar::Double(d)) => write_double(&mut out, *d)?,
                (CommonType::DoubleInterval, Scalar::DoubleInterval(iv)) => {
                    write_double(&mut out, *iv.left())?;
                    write_double(&mut out, *iv.right())?;
                }
                (_, other) if other.tag_of().is_fixed_size_integer() => {
                    write_fixed_int(&mut out, ty, &bigint_of(other)?)?
                }
                (_, other) => anyhow::bail!(UmbError::UnsupportedType(format!(
                    "value {:?} does not match declared vector type {ty:?}",
                    other.tag_of()
                ))),
            }
        }
        return Ok((out, None));
    }

    // Variable-size element types: emit a chunk CSR.
    let mut out = Vec::new();
    let mut csr = vec![0u64];
    let align_bytes = struct_ty.map(|s| (s.alignment / 8).max(1) as u64).unwrap_or(1);
    for v in values {
        match (ty, v) {
            (CommonType::String, Scalar::String(s)) => out.extend_from_slice(s.as_bytes()),
            (CommonType::Json, Scalar::Json(j)) => out.extend_from_slice(serde_json::to_string(j)?.as_bytes()),
            (CommonType::Rational, Scalar::Rational(r)) => {
                let term_size = crate::binary::rationals::term_size_for(r);
                write_rational_at_size(&mut out, r, term_size)?;
            }
            (CommonType::RationalInterval, Scalar::RationalInterval(iv)) => {
                let term_size = crate::binary::rationals::term_size_for(iv.left())
                    .max(crate::binary::rationals::term_size_for(iv.right()));
                write_rational_at_size(&mut out, iv.left(), term_size)?;
                write_rational_at_size(&mut out, iv.right(), term_size)?;
            }
            (CommonType::Int, Scalar::Int(i)) => out.extend_from_slice(&i.to_signed_bytes_le()),
            (CommonType::Uint, Scalar::Uint(u)) => out.extend_from_slice(&u.to_bytes_le()),
            (CommonType::Struct, v) => {
                let st = struct_ty.ok_or_else(|| UmbError::SchemaViolation("struct vector requires a struct type".to_string()))?;
                let record = struct_to_record(v)?;
                out.extend_from_slice(&struct_pack(st, &record)?);
            }
            (_, other) => anyhow::bail!(UmbError::UnsupportedType(format!(
                "value {:?} does not match declared vector type {ty:?}",
                other.tag_of()
            ))),
        }
        let raw_len = out.len() as u64;
        if raw_len % align_bytes != 0 {
            anyhow::bail!(UmbError::BufferNotAligned(
                "struct vector element length is not a multiple of the struct alignment".to_string()
            ));
        }
        csr.push(raw_len / align_bytes);
    }
    Ok((out, Some(csr)))
}

fn bigint_of(v: &Scalar) -> anyhow::Result<BigInt> {
    match v {
        Scalar::Int16(x) => Ok(BigInt::from(*x)),
        Scalar::Uint16(x) => Ok(BigInt::from(*x)),
        Scalar::Int32(x) => Ok(BigInt::from(*x)),
        Scalar::Uint32(x) => Ok(BigInt::from(*x)),
        Scalar::Int64(x) => Ok(BigInt::from(*x)),
        Scalar::Uint64(x) => Ok(BigInt::from(*x)),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("expected integer, got {:?}", other.tag_of()))),
    }
}

/// Decode a vector payload. `len_hint` is used only for `bool` vectors,
/// which must be truncated from the padded bitvector length to the exact
/// entity count by the caller (here, folded directly into the decoder).
pub fn bytes_to_vector(
    bytes: &[u8],
    ty: CommonType,
    struct_ty: Option<&StructType>,
    csr: Option<&[u64]>,
    len_hint: Option<usize>,
) -> anyhow::Result<Vec<Scalar>> {
    if ty == CommonType::Bool {
        let mut bits = read_bool_vec(bytes);
        if let Some(n) = len_hint {
            bits.truncate(n);
        }
        return Ok(bits.into_iter().map(Scalar::Bool).collect());
    }
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(width) = fixed_width_bytes(ty) {
        if bytes.len() % width != 0 {
            anyhow::bail!(UmbError::LengthMismatch { expected: width, actual: bytes.len() % width });
        }
        let mut out = Vec::with_capacity(bytes.len() / width);
        for chunk in bytes.chunks(width) {
            out.push(decode_fixed_chunk(chunk, ty)?);
        }
        return Ok(out);
    }

    let csr = csr.ok_or_else(|| UmbError::InvalidCsr("variable-size vector requires a chunk CSR".to_string()))?;
    let align_bytes = struct_ty.map(|s| (s.alignment / 8).max(1) as u64).unwrap_or(1);
    let ranges = crate::csr::csr_to_ranges(csr)?;
    let mut out = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        let (start, end) = ((start * align_bytes) as usize, (end * align_bytes) as usize);
        if end > bytes.len() || start > end {
            anyhow::bail!(UmbError::LengthMismatch { expected: bytes.len(), actual: end });
        }
        let chunk = &bytes[start..end];
        out.push(decode_variable_chunk(chunk, ty, struct_ty)?);
    }
    Ok(out)
}

fn decode_fixed_chunk(chunk: &[u8], ty: CommonType) -> anyhow::Result<Scalar> {
    let mut cursor = std::io::Cursor::new(chunk);
    Ok(match ty {
        CommonType::Double => Scalar::Double(read_double(&mut cursor)?),
        CommonType::DoubleInterval => {
            let left = read_double(&mut cursor)?;
            let right = read_double(&mut cursor)?;
            Scalar::DoubleInterval(crate::datatypes::Interval::new(left, right)?)
        }
        _ => {
            let big = read_fixed_int(&mut cursor, ty)?;
            scalar_of_fixed(ty, big)?
        }
    })
}

fn scalar_of_fixed(ty: CommonType, big: BigInt) -> anyhow::Result<Scalar> {
    use std::convert::TryInto;
    Ok(match ty {
        CommonType::Int16 => Scalar::Int16((&big).try_into().unwrap()),
        CommonType::Uint16 => Scalar::Uint16((&big).try_into().unwrap()),
        CommonType::Int32 => Scalar::Int32((&big).try_into().unwrap()),
        CommonType::Uint32 => Scalar::Uint32((&big).try_into().unwrap()),
        CommonType::Int64 => Scalar::Int64((&big).try_into().unwrap()),
        CommonType::Uint64 => Scalar::Uint64((&big).try_into().unwrap()),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} is not a fixed integer type"))),
    })
}

fn decode_variable_chunk(chunk: &[u8], ty: CommonType, struct_ty: Option<&StructType>) -> anyhow::Result<Scalar> {
    Ok(match ty {
        CommonType::String => Scalar::String(String::from_utf8(chunk.to_vec())?),
        CommonType::Json => Scalar::Json(serde_json::from_slice(chunk)?),
        CommonType::Rational => {
            let term_size = chunk.len() / 2;
            let mut cursor = std::io::Cursor::new(chunk);
            Scalar::Rational(read_rational_at_size(&mut cursor, term_size)?)
        }
        CommonType::RationalInterval => {
            let term_size = chunk.len() / 4;
            let mut cursor = std::io::Cursor::new(chunk);
            let left = read_rational_at_size(&mut cursor, term_size)?;
            let right = read_rational_at_size(&mut cursor, term_size)?;
            Scalar::RationalInterval(crate::datatypes::Interval::new(left, right)?)
        }
        CommonType::Int => Scalar::Int(BigInt::from_signed_bytes_le(chunk)),
        CommonType::Uint => Scalar::Uint(BigUint::from_bytes_le(chunk)),
        CommonType::Struct => {
            let st = struct_ty.ok_or_else(|| UmbError::SchemaViolation("struct vector requires a struct type".to_string()))?;
            let mut cursor = std::io::Cursor::new(chunk);
            record_to_struct(struct_unpack(&mut cursor, st)?)
        }
        other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} cannot be vectorized"))),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_vector_has_no_csr() {
        let (bytes, csr) = vector_to_bytes(&[], CommonType::String, None).unwrap();
        assert!(bytes.is_empty());
        assert!(csr.is_none());
    }

    #[test]
    fn fixed_width_vector_roundtrip_without_csr() {
        let values = vec![Scalar::Int32(1), Scalar::Int32(-2), Scalar::Int32(3)];
        let (bytes, csr) = vector_to_bytes(&values, CommonType::Int32, None).unwrap();
        assert!(csr.is_none());
        assert_eq!(bytes.len(), 12);
        let decoded = bytes_to_vector(&bytes, CommonType::Int32, None, None, None).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn string_vector_roundtrip_with_csr() {
        let values = vec![
            Scalar::String("a".to_string()),
            Scalar::String("bb".to_string()),
            Scalar::String("ccc".to_string()),
        ];
        let (bytes, csr) = vector_to_bytes(&values, CommonType::String, None).unwrap();
        let csr = csr.unwrap();
        assert_eq!(csr, vec![0, 1, 3, 6]);
        let decoded = bytes_to_vector(&bytes, CommonType::String, None, Some(&csr), None).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn bool_vector_truncates_to_entity_count() {
        let values = vec![Scalar::Bool(true), Scalar::Bool(false), Scalar::Bool(true)];
        let (bytes, _) = vector_to_bytes(&values, CommonType::Bool, None).unwrap();
        let decoded = bytes_to_vector(&bytes, CommonType::Bool, None, None, Some(3)).unwrap();
        assert_eq!(decoded, values);
    }
}
