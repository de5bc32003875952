//! Fixed and variable-length integer codecs (component C2, spec §4.2).

use crate::datatypes::CommonType;
use crate::error::UmbError;
use num_bigint::{BigInt, BigUint};
use std::io::{Read, Write};

/// Minimum bytes needed to hold `v` as two's complement (at least 1).
pub fn min_bytes_signed(v: &BigInt) -> usize {
    v.to_signed_bytes_le().len().max(1)
}

/// Minimum bytes needed to hold `v` as an unsigned magnitude (at least 1).
pub fn min_bytes_unsigned(v: &BigUint) -> usize {
    v.to_bytes_le().len().max(1)
}

/// The term size (in bytes) used to store a rational's numerator and
/// denominator at equal width: the smaller multiple of 8 bytes fitting
/// both terms. Grounded on `original_source/umbi/binary/integers.py`'s
/// `integer_size` helper.
pub fn integer_size(needed_bytes: usize) -> usize {
    needed_bytes.div_ceil(8) * 8
}

pub fn write_fixed_int<W: Write>(w: &mut W, ty: CommonType, magnitude: &BigInt) -> anyhow::Result<()> {
    macro_rules! write_as {
        ($t:ty, $name:literal) => {{
            let v: $t = magnitude.try_into().map_err(|_| UmbError::IntegerOutOfRange {
                ty: $name,
                value: magnitude.to_string(),
            })?;
            w.write_all(&v.to_le_bytes())?;
        }};
    }
    match ty {
        CommonType::Int16 => write_as!(i16, "int16"),
        CommonType::Uint16 => write_as!(u16, "uint16"),
        CommonType::Int32 => write_as!(i32, "int32"),
        CommonType::Uint32 => write_as!(u32, "uint32"),
        CommonType::Int64 => write_as!(i64, "int64"),
        CommonType::Uint64 => write_as!(u64, "uint64"),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} is not a fixed integer type"))),
    }
    Ok(())
}

pub fn read_fixed_int<R: Read>(r: &mut R, ty: CommonType) -> anyhow::Result<BigInt> {
    macro_rules! read_as {
        ($t:ty) => {{
            let mut buf = [0u8; std::mem::size_of::<$t>()];
            r.read_exact(&mut buf)?;
            BigInt::from(<$t>::from_le_bytes(buf))
        }};
    }
    Ok(match ty {
        CommonType::Int16 => read_as!(i16),
        CommonType::Uint16 => read_as!(u16),
        CommonType::Int32 => read_as!(i32),
        CommonType::Uint32 => read_as!(u32),
        CommonType::Int64 => read_as!(i64),
        CommonType::Uint64 => read_as!(u64),
        other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} is not a fixed integer type"))),
    })
}

/// Write `value` as a two's-complement integer at exactly `term_size` bytes.
pub fn write_signed_at_size<W: Write>(w: &mut W, value: &BigInt, term_size: usize) -> anyhow::Result<()> {
    let mut bytes = value.to_signed_bytes_le();
    if bytes.len() > term_size {
        anyhow::bail!(UmbError::IntegerOutOfRange {
            ty: "signed variable integer",
            value: value.to_string(),
        });
    }
    let fill = if value.sign() == num_bigint::Sign::Minus { 0xffu8 } else { 0x00u8 };
    bytes.resize(term_size, fill);
    w.write_all(&bytes)?;
    Ok(())
}

/// Write `value` as an unsigned magnitude at exactly `term_size` bytes.
pub fn write_unsigned_at_size<W: Write>(w: &mut W, value: &BigUint, term_size: usize) -> anyhow::Result<()> {
    let mut bytes = value.to_bytes_le();
    if bytes.len() > term_size {
        anyhow::bail!(UmbError::IntegerOutOfRange {
            ty: "unsigned variable integer",
            value: value.to_string(),
        });
    }
    bytes.resize(term_size, 0u8);
    w.write_all(&bytes)?;
    Ok(())
}

pub fn read_signed_at_size<R: Read>(r: &mut R, term_size: usize) -> anyhow::Result<BigInt> {
    let mut bytes = vec![0u8; term_size];
    r.read_exact(&mut bytes)?;
    Ok(BigInt::from_signed_bytes_le(&bytes))
}

pub fn read_unsigned_at_size<R: Read>(r: &mut R, term_size: usize) -> anyhow::Result<BigUint> {
    let mut bytes = vec![0u8; term_size];
    r.read_exact(&mut bytes)?;
    Ok(BigUint::from_bytes_le(&bytes))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2147483647i64, false)] // i32::MAX
    #[case(-2147483648i64, false)] // i32::MIN
    #[case(1099511627776i64, true)] // 2^40, must fail for int32
    fn int32_range_boundaries(#[case] value: i64, #[case] should_fail: bool) {
        let mut buf = Vec::new();
        let result = write_fixed_int(&mut buf, CommonType::Int32, &BigInt::from(value));
        assert_eq!(result.is_err(), should_fail);
    }

    #[test]
    fn variable_integer_roundtrip_at_size() {
        let mut buf = Vec::new();
        let v = BigInt::from(-7i64);
        write_signed_at_size(&mut buf, &v, 8).unwrap();
        assert_eq!(buf.len(), 8);
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_signed_at_size(&mut cursor, 8).unwrap(), v);
    }

    #[test]
    fn term_size_rounds_up_to_multiple_of_eight() {
        assert_eq!(integer_size(1), 8);
        assert_eq!(integer_size(8), 8);
        assert_eq!(integer_size(9), 16);
    }
}
